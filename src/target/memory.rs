//! In-memory target that keeps records per page. Used for dry runs and tests.

use crate::error::{Result, TargetError};
use crate::merge::AnnotationRecord;

use super::{DocumentAdapter, PageHandle};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryTarget {
    pages: Vec<Vec<AnnotationRecord>>,
}

impl MemoryTarget {
    pub fn new(page_count: u32) -> Self {
        Self {
            pages: vec![Vec::new(); page_count as usize],
        }
    }

    /// Records on one-based `page`; empty when the page does not exist
    pub fn annotations(&self, page: u32) -> &[AnnotationRecord] {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total_annotations(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    pub fn pages(&self) -> &[Vec<AnnotationRecord>] {
        &self.pages
    }
}

pub struct MemoryPage<'a> {
    annotations: &'a mut Vec<AnnotationRecord>,
}

impl PageHandle for MemoryPage<'_> {
    fn add_annotation(&mut self, record: &AnnotationRecord) -> Result<()> {
        self.annotations.push(record.clone());
        Ok(())
    }
}

impl DocumentAdapter for MemoryTarget {
    type Page<'a> = MemoryPage<'a>;

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&mut self, number: u32) -> Result<MemoryPage<'_>> {
        let annotations = number
            .checked_sub(1)
            .and_then(|index| self.pages.get_mut(index as usize))
            .ok_or(TargetError::MissingPage(number))?;
        Ok(MemoryPage { annotations })
    }
}
