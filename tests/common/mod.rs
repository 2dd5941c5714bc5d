#![allow(dead_code)]

/// One dependents listing row the way github.com renders it: an account
/// link, a repository link, and a star count next to the star octicon.
pub fn dependent_row(owner: &str, name: &str, stars: &str) -> String {
    format!(
        r#"<div class="Box-row">
  <span>
    <a data-repository-hovercards-enabled href="/{owner}">{owner}</a> /
    <a data-hovercard-type="repository" href="/{owner}/{name}">{name}</a>
  </span>
  <div>
    <span>
      <svg class="octicon octicon-star"></svg>
      {stars}
    </span>
  </div>
</div>"#
    )
}

/// A full listing page. `next_href` controls whether a "Next" pagination
/// link is present; without one the page renders a disabled button, like
/// github.com does on the last page.
pub fn dependents_page(rows: &[String], next_href: Option<&str>) -> String {
    let paginate = match next_href {
        Some(href) => format!(r#"<div class="paginate-container"><a href="{href}">Next</a></div>"#),
        None => r#"<div class="paginate-container"><button disabled>Next</button></div>"#.to_string(),
    };
    format!(
        "<html><body><div id=\"dependents\">{}{}</div></body></html>",
        rows.concat(),
        paginate
    )
}
