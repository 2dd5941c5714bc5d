use crate::error::{Result, ScraperError};
use scraper::{ElementRef, Html, Selector};

/// One parsed listing entry: a repository that depends on the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependentRow {
    pub name: String,
    pub stars: u32,
}

/// The outcome of parsing one listing page.
#[derive(Debug, Default)]
pub struct DependentsPage {
    pub rows: Vec<DependentRow>,
    /// Href of the "Next" pagination link, absent when the listing is exhausted.
    pub next_url: Option<String>,
}

/// Extracts dependent rows and the pagination link from a dependents page.
///
/// Selectors are compiled once and reused across pages. Rows that are missing
/// a name fragment or carry an unparsable star count are dropped, not errored.
pub struct PageParser {
    row: Selector,
    account_link: Selector,
    repo_link: Selector,
    star_icon: Selector,
    paginate_link: Selector,
}

impl PageParser {
    pub fn new() -> Result<Self> {
        Ok(PageParser {
            row: parse_selector("div.Box-row")?,
            account_link: parse_selector("a[data-repository-hovercards-enabled]")?,
            repo_link: parse_selector(r#"a[data-hovercard-type="repository"]"#)?,
            star_icon: parse_selector("svg.octicon-star")?,
            paginate_link: parse_selector("div.paginate-container a")?,
        })
    }

    pub fn parse(&self, html: &str) -> DependentsPage {
        let document = Html::parse_document(html);

        let rows = document
            .select(&self.row)
            .filter_map(|row| self.parse_row(row))
            .collect();

        let next_url = document
            .select(&self.paginate_link)
            .find(|link| link.text().collect::<String>() == "Next")
            .and_then(|link| link.value().attr("href"))
            .map(str::to_string);

        DependentsPage { rows, next_url }
    }

    fn parse_row(&self, row: ElementRef) -> Option<DependentRow> {
        let account = element_text(row.select(&self.account_link).next()?);
        let repo = element_text(row.select(&self.repo_link).next()?);
        if account.is_empty() || repo.is_empty() {
            return None;
        }

        let stars = self.parse_stars(row)?;

        Some(DependentRow {
            name: format!("{account}/{repo}"),
            stars,
        })
    }

    /// The star count lives in the text of the element wrapping the star
    /// icon, formatted with thousands separators (e.g. "1,234").
    fn parse_stars(&self, row: ElementRef) -> Option<u32> {
        let icon = row.select(&self.star_icon).next()?;
        let container = icon.parent().and_then(ElementRef::wrap)?;
        let text = container.text().collect::<String>();
        text.trim().replace(',', "").parse().ok()
    }
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScraperError::Selector(e.to_string()))
}
