//! Row builder: bucket a track's sections into rows and synthesize pre/post-roll.

use std::collections::BTreeMap;

use crate::data::{EvalData, EvalFlags, RowSectionData, SectionData, SectionDesc};
use crate::rules::CompilerRules;

/// Sections sharing one row, compiled together with the row's rules.
#[derive(Clone, Default)]
pub struct Row<'r> {
    pub sections: Vec<RowSectionData>,
    pub rules: Option<&'r dyn CompilerRules>,
}

impl<'r> Row<'r> {
    pub fn new(rules: Option<&'r dyn CompilerRules>) -> Self {
        Self {
            sections: Vec::new(),
            rules,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Compiler input for this row; `impl_index` refers into `self.sections`.
    pub fn section_data(&self) -> Vec<SectionData> {
        self.sections.iter().map(|s| s.data.clone()).collect()
    }
}

impl std::fmt::Debug for Row<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row")
            .field("sections", &self.sections)
            .field("has_rules", &self.rules.is_some())
            .finish()
    }
}

/// Rows in priority order (first row outranks the rest).
#[derive(Clone, Debug, Default)]
pub struct Rows<'r> {
    pub rows: Vec<Row<'r>>,
}

impl<'r> Rows<'r> {
    /// Bucket `sections` by row index. `None` and inactive entries are skipped.
    /// Only rows that receive a section are produced, in ascending row index
    /// order. `rules` is attached to every row.
    pub fn build(sections: &[Option<SectionDesc>], rules: Option<&'r dyn CompilerRules>) -> Self {
        // Keyed by row index so sparse indices cost nothing.
        let mut rows: BTreeMap<usize, Row<'r>> = BTreeMap::new();

        for (index, desc) in sections.iter().enumerate() {
            let Some(desc) = desc.as_ref().filter(|d| d.active) else {
                continue;
            };
            let row = rows
                .entry(desc.row_index)
                .or_insert_with(|| Row::new(rules));

            let range = desc.effective_range();
            let impl_index = row.sections.len();
            row.sections.push(RowSectionData::new(
                index,
                SectionData::new(range, EvalData::new(impl_index), desc.priority),
            ));

            if let Some(pre) = desc.pre_roll_range() {
                row.sections.push(RowSectionData::new(
                    index,
                    SectionData::new(
                        pre,
                        EvalData::with_flags(impl_index, EvalFlags::PreRoll),
                        desc.priority,
                    ),
                ));
            }
            if let Some(post) = desc.post_roll_range() {
                row.sections.push(RowSectionData::new(
                    index,
                    SectionData::new(
                        post,
                        EvalData::with_flags(impl_index, EvalFlags::PostRoll),
                        desc.priority,
                    ),
                ));
            }
        }

        Self {
            rows: rows.into_values().collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row<'r>> {
        self.rows.iter()
    }
}
