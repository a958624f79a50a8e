use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, info};
use zip::ZipArchive;
use zip::result::ZipError;

use super::*;

pub struct DocxPackage {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

#[derive(Debug, Clone, Default)]
pub struct PackageContents {
    pub blocks: Vec<RawBlock>,
    pub images: ImageRelationships,
}

impl DocxPackage {
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let bytes = fs::read(path)
            .map_err(|err| ExtractError::io(format!("document {}", path.display()), err))?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ExtractError> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;
        Ok(Self { archive })
    }

    pub fn read(&mut self) -> Result<PackageContents, ExtractError> {
        let images = self.image_relationships()?;
        let styles = self.style_names()?;
        let xml = self
            .read_part(DOCUMENT_PART)?
            .ok_or_else(|| ExtractError::MissingPart(DOCUMENT_PART.to_string()))?;
        let blocks = walk_body(&xml, &styles)?;

        info!(
            blocks = blocks.len(),
            images = images.len(),
            "read document body"
        );

        Ok(PackageContents { blocks, images })
    }

    pub fn media(&mut self, path: &str) -> Result<Vec<u8>, ExtractError> {
        let mut file = match self.archive.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(ExtractError::MissingPart(path.to_string())),
            Err(err) => return Err(err.into()),
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|err| ExtractError::io(format!("media part {path}"), err))?;
        Ok(bytes)
    }

    fn read_part(&mut self, name: &str) -> Result<Option<String>, ExtractError> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|err| ExtractError::io(format!("package part {name}"), err))?;
        Ok(Some(content))
    }

    fn image_relationships(&mut self) -> Result<ImageRelationships, ExtractError> {
        let Some(xml) = self.read_part(RELATIONSHIPS_PART)? else {
            debug!("package has no document relationships");
            return Ok(ImageRelationships::default());
        };
        parse_image_relationships(&xml)
    }

    fn style_names(&mut self) -> Result<StyleNames, ExtractError> {
        let Some(xml) = self.read_part(STYLES_PART)? else {
            debug!("package has no style definitions");
            return Ok(StyleNames::default());
        };
        parse_style_names(&xml)
    }
}

pub(super) fn parse_image_relationships(xml: &str) -> Result<ImageRelationships, ExtractError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut relationships = ImageRelationships::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let is_image = attr_value(e, b"Type")
                    .map(|value| value.ends_with("/image"))
                    .unwrap_or(false);
                let is_external = attr_value(e, b"TargetMode")
                    .map(|value| value.eq_ignore_ascii_case("External"))
                    .unwrap_or(false);
                if !is_image || is_external {
                    continue;
                }
                if let (Some(id), Some(target)) = (attr_value(e, b"Id"), attr_value(e, b"Target"))
                {
                    relationships.insert(&id, &resolve_part_path(&target));
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(ExtractError::xml(RELATIONSHIPS_PART, err)),
            _ => {}
        }
    }

    Ok(relationships)
}

pub(super) fn parse_style_names(xml: &str) -> Result<StyleNames, ExtractError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut styles = StyleNames::default();
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"style" => {
                current_id = attr_value(e, b"styleId");
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"name" =>
            {
                if let (Some(id), Some(name)) = (current_id.as_ref(), attr_value(e, b"val")) {
                    styles.names.insert(id.clone(), name);
                }
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"style" => {
                current_id = None;
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(ExtractError::xml(STYLES_PART, err)),
            _ => {}
        }
    }

    Ok(styles)
}

fn resolve_part_path(target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{target}"),
    };

    let mut segments = Vec::<&str>::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
