//! Heuristic heading detection from font sizes and text patterns.
//!
//! Spans are grouped into lines, the dominant font size is taken as body
//! text, and each line is scored on its size excess over the body, its
//! enumeration and whether it is a canonical section name.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{estimated_width, Document, HeadingCandidate, HeadingSignal, Page, TextSpan};
use crate::parser::OutlineOptions;

/// Body size assumed for documents without any text.
const DEFAULT_BODY_SIZE: f32 = 12.0;

/// Lines whose baseline differs by at most this fraction of the font size share a line.
const LINE_TOLERANCE: f32 = 0.3;

/// Horizontal gaps wider than this fraction of a character width become a space.
const WORD_GAP: f32 = 0.2;

/// Enumerated headings have at most this many words after the number.
const MAX_PHRASE_WORDS: usize = 12;

const SIZE_WEIGHT: f32 = 0.5;
const NUMBERED_WEIGHT: f32 = 0.35;
const KEYWORD_WEIGHT: f32 = 0.3;
const ROMAN_WEIGHT: f32 = 0.3;
const BOLD_WEIGHT: f32 = 0.1;

/// "2", "2.", "3.1", "3.1.2." followed by the heading phrase.
static NUMBERED_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}(?:\.\d{1,2})*)\.?\s+(\p{Lu}.*)$").unwrap());

/// "IV." followed by the heading phrase.
static ROMAN_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([IVX]{1,6})\.\s+(\p{Lu}.*)$").unwrap());

static ROMAN_NUMERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^X{0,3}(?:IX|IV|V?I{0,3})$").unwrap());

/// Canonical section names, optionally enumerated and followed by a colon.
static SECTION_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:\d{1,2}(?:\.\d{1,2})*|[ivx]{1,6})\.?\s+)?(?:abstract|introduction|background|related\s+work|preliminaries|methods?|methodology|approach|experiments|experimental\s+setup|results|evaluation|discussion|conclusions?|future\s+work|limitations|acknowledge?ments|references|bibliography|appendix(?:\s+[a-z0-9])?)\s*:?$",
    )
    .unwrap()
});

/// Document-wide font-size histogram.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Body text font size (most common)
    pub body_size: f32,
    /// Span counts keyed by size in tenths of a point
    pub size_histogram: BTreeMap<i32, usize>,
}

impl FontStatistics {
    /// Collect and analyze the sizes of every span in the document.
    pub fn from_document(doc: &Document) -> Self {
        let mut stats = Self::default();
        for span in doc.pages.iter().flat_map(|p| p.text_spans.iter()) {
            stats.add_size(span.font_size);
        }
        stats.analyze();
        stats
    }

    /// Add a font size observation.
    pub fn add_size(&mut self, size: f32) {
        if size.is_finite() && size > 0.0 {
            *self.size_histogram.entry(size_key(size)).or_insert(0) += 1;
        }
    }

    /// Calculate the body size. Ties go to the smaller size.
    pub fn analyze(&mut self) {
        let mut best: Option<(i32, usize)> = None;
        for (&key, &count) in &self.size_histogram {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((key, count));
            }
        }
        self.body_size = best.map_or(DEFAULT_BODY_SIZE, |(key, _)| key as f32 / 10.0);
    }

    /// Ratio of a font size to the body size.
    pub fn ratio(&self, font_size: f32) -> f32 {
        if self.body_size > 0.0 {
            font_size / self.body_size
        } else {
            1.0
        }
    }

    /// Whether no size was observed.
    pub fn is_empty(&self) -> bool {
        self.size_histogram.is_empty()
    }
}

fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// A visual line of text rebuilt from consecutive spans.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Joined text with whitespace collapsed
    pub text: String,
    /// Character-weighted mean font size
    pub font_size: f32,
    /// 0-based page index
    pub page_index: usize,
    /// Whether every span of the line is set in a bold font
    pub is_bold: bool,
}

impl TextLine {
    /// Create a line from spans sharing a baseline.
    pub fn from_spans(spans: &[&TextSpan]) -> Self {
        let mut ordered: Vec<&TextSpan> = spans.to_vec();
        ordered.sort_by(|a, b| {
            a.bounding_box
                .x0
                .partial_cmp(&b.bounding_box.x0)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut text = String::new();
        let mut prev_end: Option<f32> = None;
        for span in &ordered {
            if let Some(end) = prev_end {
                let gap = span.bounding_box.x0 - end;
                if gap > estimated_width(span.font_size, 1) * WORD_GAP {
                    text.push(' ');
                }
            }
            text.push_str(&span.text);
            prev_end = Some(span.bounding_box.x1);
        }

        let total_chars: usize = ordered.iter().map(|s| visible_chars(&s.text)).sum();
        let font_size = if total_chars > 0 {
            ordered
                .iter()
                .map(|s| s.font_size * visible_chars(&s.text) as f32)
                .sum::<f32>()
                / total_chars as f32
        } else {
            ordered.first().map_or(0.0, |s| s.font_size)
        };

        Self {
            text: text.split_whitespace().collect::<Vec<_>>().join(" "),
            font_size,
            page_index: ordered.first().map_or(0, |s| s.page_index),
            is_bold: !ordered.is_empty()
                && ordered
                    .iter()
                    .filter(|s| visible_chars(&s.text) > 0)
                    .all(|s| s.is_bold),
        }
    }
}

fn visible_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Group the spans of a page into lines, in reading order.
pub fn group_lines(page: &Page) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let mut current: Vec<&TextSpan> = Vec::new();

    for span in &page.text_spans {
        if let Some(first) = current.first() {
            let tolerance = span.font_size.max(first.font_size) * LINE_TOLERANCE;
            if (span.baseline() - first.baseline()).abs() > tolerance {
                lines.push(TextLine::from_spans(&current));
                current.clear();
            }
        }
        current.push(span);
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(&current));
    }

    lines.retain(|line| !line.text.is_empty());
    lines
}

/// Score a line as a potential heading.
///
/// Returns `None` for body text. Numbered candidates carry their enumeration
/// depth as `inferred_level`; all others start at level 1, and those found by
/// size alone are re-tiered by [`HeadingDetector`].
pub fn classify_line(
    line: &TextLine,
    stats: &FontStatistics,
    options: &OutlineOptions,
) -> Option<HeadingCandidate> {
    let text = line.text.trim();
    if text.is_empty()
        || text.chars().count() > options.max_heading_length
        || !text.chars().any(char::is_alphabetic)
    {
        return None;
    }

    let ratio = stats.ratio(line.font_size);
    let size_qualified = ratio > options.size_margin;

    let numbering = numbered_depth(text);
    let roman = numbering.is_none() && is_roman_heading(text);
    let keyword = SECTION_KEYWORD.is_match(text);
    let pattern = numbering.is_some() || roman || keyword;

    if !size_qualified && !(pattern && ratio >= options.min_pattern_ratio) {
        return None;
    }

    let mut score = 0.0;
    if ratio > 1.0 {
        score += (ratio - 1.0).min(1.0) * SIZE_WEIGHT;
    }
    if numbering.is_some() {
        score += NUMBERED_WEIGHT;
    }
    if roman {
        score += ROMAN_WEIGHT;
    }
    if keyword {
        score += KEYWORD_WEIGHT;
    }
    if line.is_bold {
        score += BOLD_WEIGHT;
    }

    let signal = if numbering.is_some() {
        HeadingSignal::Numbered
    } else if roman {
        HeadingSignal::Roman
    } else if keyword {
        HeadingSignal::Keyword
    } else {
        HeadingSignal::FontSize
    };

    let level = numbering
        .map(|depth| depth.min(options.max_levels as usize) as u8)
        .unwrap_or(1);

    Some(HeadingCandidate {
        text: text.to_string(),
        page_index: line.page_index,
        font_size: line.font_size,
        score: score.min(1.0),
        inferred_level: level.max(1),
        signal,
    })
}

/// Enumeration depth of a numbered heading ("3.1 Data" has depth 2).
fn numbered_depth(text: &str) -> Option<usize> {
    let caps = NUMBERED_HEADING.captures(text)?;
    let phrase = caps.get(2)?.as_str();
    if !is_heading_phrase(phrase) {
        return None;
    }
    Some(caps.get(1)?.as_str().split('.').count())
}

fn is_roman_heading(text: &str) -> bool {
    ROMAN_HEADING
        .captures(text)
        .and_then(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .map(|(numeral, phrase)| ROMAN_NUMERAL.is_match(numeral) && is_heading_phrase(phrase))
        .unwrap_or(false)
}

fn is_heading_phrase(phrase: &str) -> bool {
    let phrase = phrase.trim();
    phrase.split_whitespace().count() <= MAX_PHRASE_WORDS
        && !phrase.ends_with('.')
        && !phrase.ends_with(',')
        && !phrase.contains('@')
        && phrase.chars().any(char::is_alphabetic)
}

/// Result of a detection pass.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// Heading candidates in page and reading order
    pub candidates: Vec<HeadingCandidate>,
    /// Title block found on the first page, if any
    pub title: Option<String>,
    /// Detected body font size
    pub body_size: f32,
}

/// Heuristic heading detector.
#[derive(Debug, Clone)]
pub struct HeadingDetector {
    options: OutlineOptions,
}

impl HeadingDetector {
    /// Create a detector using the thresholds of `options`.
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            options: options.clone(),
        }
    }

    /// Detect heading candidates. Never fails; empty when nothing qualifies.
    pub fn detect(&self, doc: &Document) -> Vec<HeadingCandidate> {
        self.analyze(doc).candidates
    }

    /// Detect the title block on the first page.
    pub fn detect_title(&self, doc: &Document) -> Option<String> {
        self.analyze(doc).title
    }

    /// Run one detection pass producing candidates and the title block together.
    pub fn analyze(&self, doc: &Document) -> Detection {
        let stats = FontStatistics::from_document(doc);
        log::debug!("Body font size: {:.1}pt", stats.body_size);

        let mut candidates: Vec<HeadingCandidate> = doc
            .pages
            .iter()
            .flat_map(group_lines)
            .filter_map(|line| classify_line(&line, &stats, &self.options))
            .collect();

        let mut tiers = self.size_tiers(&candidates, &stats);

        let mut title = None;
        if self.options.detect_title {
            if let Some(block) = self.take_title_block(&mut candidates, &tiers) {
                title = Some(block);
                tiers = self.size_tiers(&candidates, &stats);
            }
        }

        log::debug!("Heading size tiers: {:?}", tiers);

        for candidate in &mut candidates {
            if candidate.signal == HeadingSignal::FontSize {
                candidate.inferred_level =
                    tier_level(&tiers, candidate.font_size, self.options.max_levels);
            }
        }

        Detection {
            candidates,
            title,
            body_size: stats.body_size,
        }
    }

    /// Distinct sizes of size-qualified candidates, largest first.
    fn size_tiers(&self, candidates: &[HeadingCandidate], stats: &FontStatistics) -> Vec<i32> {
        let mut tiers: Vec<i32> = candidates
            .iter()
            .filter(|c| stats.ratio(c.font_size) > self.options.size_margin)
            .map(|c| size_key(c.font_size))
            .collect();
        tiers.sort_unstable_by(|a, b| b.cmp(a));
        tiers.dedup();
        tiers
    }

    /// Remove the top tier when it is a size-only block confined to the first page.
    ///
    /// Enumerated and canonical section headings are never part of the title.
    fn take_title_block(
        &self,
        candidates: &mut Vec<HeadingCandidate>,
        tiers: &[i32],
    ) -> Option<String> {
        let top = *tiers.first()?;
        let in_top = |c: &HeadingCandidate| size_key(c.font_size) == top;

        let confined = candidates
            .iter()
            .filter(|c| in_top(c))
            .all(|c| c.page_index == 0 && c.signal == HeadingSignal::FontSize);
        let others = candidates.iter().any(|c| !in_top(c));
        if !confined || !others {
            return None;
        }

        let (block, rest): (Vec<_>, Vec<_>) = candidates.drain(..).partition(|c| in_top(c));
        *candidates = rest;

        let title = block
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        log::debug!("Title block on first page: {:?}", title);
        Some(title)
    }
}

fn tier_level(tiers: &[i32], font_size: f32, max_levels: u8) -> u8 {
    let key = size_key(font_size);
    let position = tiers.iter().position(|&t| t == key).unwrap_or(tiers.len());
    (position + 1).min(max_levels.max(1) as usize) as u8
}

/// Detect heading candidates with default options.
pub fn detect(doc: &Document) -> Vec<HeadingCandidate> {
    HeadingDetector::new(&OutlineOptions::default()).detect(doc)
}
