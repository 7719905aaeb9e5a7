use crate::config::ExtractConfig;
use crate::constants;
use crate::error::{Result, TrackerError};
use crate::pipeline::normalize::NameNormalizer;
use crate::types::Record;
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// Why a sheet row did not become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RejectReason {
    HeaderRow,
    TooFewCells,
    MissingLabelOrLink,
    Excluded,
    FlaggedLabel,
    UtilityRow,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::HeaderRow => "header_row",
            RejectReason::TooFewCells => "too_few_cells",
            RejectReason::MissingLabelOrLink => "missing_label_or_link",
            RejectReason::Excluded => "excluded",
            RejectReason::FlaggedLabel => "flagged_label",
            RejectReason::UtilityRow => "utility_row",
        }
    }
}

/// True for the recurring "BPM & Key" tool rows, which are not artists.
pub fn is_utility_row(identity: &str) -> bool {
    let lower = identity.to_lowercase();
    lower.contains("bpm") && lower.contains("key")
}

/// A table row reduced to the text the admission rules look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Trimmed text of the first cell, before normalization
    pub label: String,
    /// Raw href of the first anchor in the first cell, empty when absent
    pub href: String,
    /// Trimmed text of every cell, the first one included
    pub cells: Vec<String>,
}

impl RawRow {
    fn from_element(row: ElementRef<'_>, cell_sel: &Selector, link_sel: &Selector) -> Self {
        let cells: Vec<ElementRef<'_>> = row.select(cell_sel).collect();
        let texts: Vec<String> = cells.iter().map(element_text).collect();
        let href = cells
            .first()
            .and_then(|c| c.select(link_sel).next())
            .and_then(|a| a.value().attr("href"))
            .unwrap_or("")
            .to_string();
        Self {
            label: texts.first().cloned().unwrap_or_default(),
            href,
            cells: texts,
        }
    }

    fn cell(&self, index: usize) -> String {
        self.cells.get(index).cloned().unwrap_or_default()
    }
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Admission rules for sheet rows.
#[derive(Debug, Clone)]
pub struct ExtractRules {
    pub header_rows: usize,
    pub min_cells: usize,
    pub section_marker: String,
    pub flag_glyph: String,
    pub exclude: HashSet<String>,
    pub normalizer: NameNormalizer,
}

impl ExtractRules {
    pub fn from_config(config: &ExtractConfig) -> Self {
        Self {
            header_rows: config.header_rows,
            min_cells: config.min_cells,
            section_marker: config.section_marker.clone(),
            flag_glyph: config.flag_glyph.clone(),
            exclude: config.exclude.iter().cloned().collect(),
            normalizer: NameNormalizer::new(&config.strip_chars),
        }
    }
}

impl Default for ExtractRules {
    fn default() -> Self {
        Self::from_config(&ExtractConfig::default())
    }
}

/// Admitted records in document order plus a tally of rejected rows.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub rejected: BTreeMap<RejectReason, usize>,
}

impl Extraction {
    pub fn rejected_count(&self, reason: RejectReason) -> usize {
        self.rejected.get(&reason).copied().unwrap_or(0)
    }
}

pub struct TableExtractor {
    rules: ExtractRules,
}

impl TableExtractor {
    pub fn new(rules: ExtractRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ExtractRules {
        &self.rules
    }

    /// Parses the exported sheet and extracts artist records from its table.
    ///
    /// Fails only when the table body is absent; individual bad rows are
    /// skipped and counted.
    pub fn extract_html(&self, html: &str) -> Result<Extraction> {
        debug!("TableExtractor: start html_len={}", html.len());
        let document = Html::parse_document(html);
        let body_sel = Selector::parse(constants::TABLE_BODY_SELECTOR)
            .map_err(|e| TrackerError::Parse(format!("bad selector: {:?}", e)))?;
        let row_sel = Selector::parse("tr").map_err(|e| TrackerError::Parse(format!("bad selector: {:?}", e)))?;
        let cell_sel = Selector::parse("td").map_err(|e| TrackerError::Parse(format!("bad selector: {:?}", e)))?;
        let link_sel = Selector::parse("a").map_err(|e| TrackerError::Parse(format!("bad selector: {:?}", e)))?;

        let body = document.select(&body_sel).next().ok_or_else(|| {
            TrackerError::Parse(format!("could not find '{}' in document", constants::TABLE_BODY_SELECTOR))
        })?;
        let rows: Vec<RawRow> = body
            .select(&row_sel)
            .map(|row| RawRow::from_element(row, &cell_sel, &link_sel))
            .collect();

        let extraction = self.extract_rows(rows);
        info!(
            "TableExtractor: admitted {} records, rejected {}",
            extraction.records.len(),
            extraction.rejected.values().sum::<usize>()
        );
        if extraction.records.is_empty() {
            warn!("TableExtractor: table body present but no rows admitted");
        }
        Ok(extraction)
    }

    /// Applies the admission chain to rows in document order.
    pub fn extract_rows<I>(&self, rows: I) -> Extraction
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut extraction = Extraction::default();
        let mut featured_section = true;
        for (index, row) in rows.into_iter().enumerate() {
            match self.admit(index, &row, &mut featured_section) {
                Ok(record) => extraction.records.push(record),
                Err(reason) => {
                    debug!("TableExtractor: row {} rejected ({}) label='{}'", index, reason.as_str(), row.label);
                    *extraction.rejected.entry(reason).or_insert(0) += 1;
                }
            }
        }
        extraction
    }

    /// Runs one row through the admission chain. The section flag flips on any
    /// row that gets past the label/link check, even if it is then excluded.
    fn admit(&self, index: usize, row: &RawRow, featured_section: &mut bool) -> std::result::Result<Record, RejectReason> {
        if index < self.rules.header_rows {
            return Err(RejectReason::HeaderRow);
        }
        if row.cells.len() < self.rules.min_cells {
            return Err(RejectReason::TooFewCells);
        }
        let label = row.label.trim();
        if label.is_empty() || row.href.trim().is_empty() {
            return Err(RejectReason::MissingLabelOrLink);
        }

        // Raw label, before normalization
        if label.contains(&self.rules.section_marker) {
            *featured_section = false;
        }

        let identity = self.rules.normalizer.normalize(label);
        if self.rules.exclude.contains(&identity) {
            return Err(RejectReason::Excluded);
        }
        if !self.rules.flag_glyph.is_empty() && label.contains(&self.rules.flag_glyph) {
            return Err(RejectReason::FlaggedLabel);
        }
        if is_utility_row(&identity) {
            return Err(RejectReason::UtilityRow);
        }
        if identity.is_empty() {
            // Label made only of stripped decorations
            return Err(RejectReason::MissingLabelOrLink);
        }

        Ok(Record {
            identity,
            link: row.href.clone(),
            credit: row.cell(1),
            availability: row.cell(3),
            last_updated: row.cell(2),
            featured: *featured_section,
        })
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new(ExtractRules::default())
    }
}
