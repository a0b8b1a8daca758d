//! JPEG to PDF assembly
//!
//! Builds a PDF with one page per image, each page sized to its image. JPEG
//! bytes are embedded as-is in a DCTDecode image XObject, so no re-encoding
//! happens.

use crate::pages::error::PageError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::PathBuf;

/// Build a PDF from JPEG files, one page per image, in input order.
pub fn images_to_pdf(jpegs: &[PathBuf]) -> Result<Document, PageError> {
    if jpegs.is_empty() {
        return Err(PageError::Image("no images supplied".to_string()));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();

    for path in jpegs {
        let (width, height) = image::image_dimensions(path)
            .map_err(|e| PageError::Image(format!("{}: {}", path.display(), e)))?;
        let data = std::fs::read(path)
            .map_err(|e| PageError::Image(format!("{}: {}", path.display(), e)))?;

        let image_stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            data,
        )
        .with_compression(false);
        let image_id = doc.add_object(image_stream);

        // Scale the unit image square up to the full page
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        (width as i64).into(),
                        0.into(),
                        0.into(),
                        (height as i64).into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                0.into(),
                0.into(),
                (width as i64).into(),
                (height as i64).into(),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => Object::Reference(image_id) },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => jpegs.len() as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::RgbImage;

    fn write_jpeg(path: &std::path::Path, width: u32, height: u32) {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 100, 50]));
        let file = std::fs::File::create(path).unwrap();
        let mut encoder = JpegEncoder::new(file);
        encoder.encode_image(&img).unwrap();
    }

    #[test]
    fn builds_one_page_per_image() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        write_jpeg(&a, 40, 30);
        write_jpeg(&b, 20, 60);

        let doc = images_to_pdf(&[a, b]).unwrap();

        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn pages_are_sized_to_their_images() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        write_jpeg(&a, 40, 30);

        let doc = images_to_pdf(&[a]).unwrap();

        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_i64().unwrap(), 40);
        assert_eq!(media_box[3].as_i64().unwrap(), 30);
    }

    #[test]
    fn rejects_empty_input() {
        match images_to_pdf(&[]) {
            Err(PageError::Image(_)) => {}
            other => panic!("Expected Image error, got: {:?}", other),
        }
    }

    #[test]
    fn rejects_non_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("not.jpg");
        std::fs::write(&bogus, b"plain text").unwrap();

        assert!(images_to_pdf(&[bogus]).is_err());
    }
}
