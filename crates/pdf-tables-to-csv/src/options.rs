use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::ExtractError;

/// One comma-separated item of a page specifier. `end: None` means "to the
/// last page of the document".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: Option<u32>,
}

/// Pages to extract, as typed by the user: `all`, `3`, `1,3,4`, `2-5`, `3-end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSpec {
    All,
    Ranges(Vec<PageRange>),
}

impl PageSpec {
    #[must_use]
    pub fn single(page: u32) -> Self {
        Self::Ranges(vec![PageRange {
            start: page,
            end: Some(page),
        }])
    }

    /// Expands the specifier against the document, returning sorted, unique,
    /// 1-based page numbers.
    pub fn resolve(&self, page_count: usize) -> Result<Vec<u32>, ExtractError> {
        let last = u32::try_from(page_count).map_err(|_| {
            ExtractError::InvalidOption(format!("document has too many pages: {page_count}"))
        })?;

        let ranges = match self {
            Self::All => return Ok((1..=last).collect()),
            Self::Ranges(ranges) => ranges,
        };

        let mut pages = Vec::new();
        for range in ranges {
            let end = range.end.unwrap_or(last);
            for page in [range.start, end] {
                if page > last {
                    return Err(ExtractError::PageOutOfRange { page, page_count });
                }
            }
            pages.extend(range.start..=end);
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(pages)
    }
}

fn parse_page_number(raw: &str) -> Result<u32, ExtractError> {
    let page: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ExtractError::InvalidPageSelection(format!("invalid page number: '{raw}'")))?;
    if page == 0 {
        return Err(ExtractError::InvalidPageSelection(
            "pages are 1-based".to_string(),
        ));
    }
    Ok(page)
}

impl FromStr for PageSpec {
    type Err = ExtractError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let spec = spec.trim();
        if spec.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let mut ranges = Vec::new();
        for token in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if let Some((start, end)) = token.split_once('-') {
                let start = parse_page_number(start)?;
                let end = if end.trim().eq_ignore_ascii_case("end") {
                    None
                } else {
                    Some(parse_page_number(end)?)
                };
                if end.is_some_and(|end| end < start) {
                    return Err(ExtractError::InvalidPageSelection(format!(
                        "invalid range '{token}': end is smaller than start"
                    )));
                }
                ranges.push(PageRange { start, end });
            } else {
                let page = parse_page_number(token)?;
                ranges.push(PageRange {
                    start: page,
                    end: Some(page),
                });
            }
        }

        if ranges.is_empty() {
            return Err(ExtractError::InvalidPageSelection(
                "page selection cannot be empty".to_string(),
            ));
        }

        Ok(Self::Ranges(ranges))
    }
}

/// Table detection strategy. Only whitespace-stream heuristics are available;
/// there is no ruled-line detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Flavor {
    #[default]
    Stream,
}

impl Display for Flavor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stream => f.write_str("stream"),
        }
    }
}

impl FromStr for Flavor {
    type Err = ExtractError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stream" => Ok(Self::Stream),
            other => Err(ExtractError::InvalidOption(format!(
                "unsupported flavor '{other}', expected 'stream'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    pub pages: PageSpec,
    pub flavor: Flavor,
    pub min_cols: usize,
}

impl ReadOptions {
    #[must_use]
    pub fn for_pages(pages: PageSpec) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            pages: PageSpec::single(1),
            flavor: Flavor::Stream,
            min_cols: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Flavor, PageSpec};
    use crate::error::ExtractError;
    use std::str::FromStr;

    #[test]
    fn parse_ranges_lists_and_open_end() {
        let spec = PageSpec::from_str("4, 1-2, 6-end").expect("spec should parse");
        assert_eq!(spec.resolve(7).expect("in range"), vec![1, 2, 4, 6, 7]);
    }

    #[test]
    fn all_expands_to_every_page() {
        let spec = PageSpec::from_str(" ALL ").expect("spec should parse");
        assert_eq!(spec, PageSpec::All);
        assert_eq!(spec.resolve(3).expect("in range"), vec![1, 2, 3]);
    }

    #[test]
    fn duplicates_are_removed() {
        let spec = PageSpec::from_str("2,2,1-2").expect("spec should parse");
        assert_eq!(spec.resolve(2).expect("in range"), vec![1, 2]);
    }

    #[test]
    fn reject_non_numeric_and_zero_pages() {
        assert!(matches!(
            PageSpec::from_str("abc"),
            Err(ExtractError::InvalidPageSelection(_))
        ));
        assert!(matches!(
            PageSpec::from_str("0"),
            Err(ExtractError::InvalidPageSelection(_))
        ));
        assert!(matches!(
            PageSpec::from_str(""),
            Err(ExtractError::InvalidPageSelection(_))
        ));
    }

    #[test]
    fn reject_reversed_range() {
        let err = PageSpec::from_str("3-1").expect_err("reversed range should fail");
        assert!(err.to_string().contains("end is smaller than start"));
    }

    #[test]
    fn out_of_range_page_is_reported() {
        let spec = PageSpec::from_str("5").expect("spec should parse");
        let err = spec.resolve(2).expect_err("page 5 does not exist");
        assert!(matches!(
            err,
            ExtractError::PageOutOfRange {
                page: 5,
                page_count: 2
            }
        ));
    }

    #[test]
    fn flavor_parses_stream_only() {
        assert_eq!(Flavor::from_str("Stream").expect("stream"), Flavor::Stream);
        assert!(Flavor::from_str("lattice").is_err());
    }
}
