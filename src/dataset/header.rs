use log::debug;

use crate::container::ArrayHandle;
use crate::record::{HeaderDocument, Record};

use super::{paths, Dataset, DatasetError};

impl Dataset {
    /// Store the XML header document, replacing any previous one
    pub fn write_header(&mut self, xml: &str) -> Result<(), DatasetError> {
        let handle = if paths::exists(&self.container, &self.xml_path) {
            self.header_handle()?
        } else {
            debug!("Creating header array {}", self.xml_path);
            self.container.create_array(
                &self.xml_path,
                HeaderDocument::type_descriptor(),
                &[1],
                &[Some(1)],
                &[1],
            )?
        };

        let document = HeaderDocument(xml.to_string());
        self.container
            .write_hyperslab(handle, &[0], &[1], vec![document.encode()])?;
        Ok(())
    }

    /// Read the XML header document
    pub fn read_header(&self) -> Result<String, DatasetError> {
        if !paths::exists(&self.container, &self.xml_path) {
            return Err(DatasetError::NotFound(self.xml_path.clone()));
        }
        let handle = self.header_handle()?;
        let elements = self.container.read_hyperslab(handle, &[0], &[1])?;
        let bytes = elements
            .first()
            .ok_or_else(|| DatasetError::CorruptRecord(format!("{} is empty", self.xml_path)))?;
        Ok(HeaderDocument::decode(bytes)?.0)
    }

    /// Whether a header document is stored
    pub fn has_header(&self) -> bool {
        paths::exists(&self.container, &self.xml_path)
    }

    fn header_handle(&self) -> Result<ArrayHandle, DatasetError> {
        let handle = self.container.open_array(&self.xml_path)?;
        let actual = self.container.type_of(handle)?;
        let expected = HeaderDocument::type_descriptor();
        if actual != expected {
            return Err(DatasetError::TypeMismatch {
                path: self.xml_path.clone(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        let rank = self.container.extent(handle)?.len();
        if rank != 1 {
            return Err(DatasetError::RankMismatch {
                path: self.xml_path.clone(),
                expected: 1,
                actual: rank,
            });
        }
        Ok(handle)
    }
}
