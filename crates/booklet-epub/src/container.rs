//! `META-INF/container.xml` lookup

use crate::archive::EpubArchive;
use crate::types::{EpubError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

pub const CONTAINER_PATH: &str = "META-INF/container.xml";

const PACKAGE_MEDIA_TYPE: &str = "application/oebps-package+xml";

/// Archive path of the package descriptor (OPF) named by container.xml
pub fn descriptor_path(archive: &EpubArchive) -> Result<String> {
    let container = archive
        .read_text(CONTAINER_PATH)?
        .ok_or_else(|| EpubError::structural(format!("missing {}", CONTAINER_PATH)))?;

    let path = rootfile_path(&container)?;
    if !archive.contains(&path) {
        return Err(EpubError::structural(format!(
            "rootfile {} not found in archive",
            path
        )));
    }
    Ok(path)
}

/// First rootfile `full-path`, preferring the OPF package media type
pub fn rootfile_path(container_xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(container_xml);
    let mut fallback = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"rootfile" => {
                let mut full_path = None;
                let mut media_type = None;
                for attr in e.attributes() {
                    let attr = attr?;
                    match attr.key.local_name().as_ref() {
                        b"full-path" => full_path = Some(attr.unescape_value()?.into_owned()),
                        b"media-type" => media_type = Some(attr.unescape_value()?.into_owned()),
                        _ => {}
                    }
                }
                let Some(full_path) = full_path.filter(|p| !p.is_empty()) else {
                    continue;
                };
                if media_type.as_deref() == Some(PACKAGE_MEDIA_TYPE) {
                    return Ok(full_path);
                }
                fallback.get_or_insert(full_path);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    fallback.ok_or_else(|| EpubError::structural("container.xml names no rootfile"))
}
