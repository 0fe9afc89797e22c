use scraper::{ElementRef, Html, Selector};
use tokio::task::spawn_blocking;

use crate::record::{FieldValue, ReviewRecord};
use crate::{Error, Result};

/// Every selector the extractor needs, compiled once per page.
struct ReviewSelectors {
    review: Selector,
    date_published: Selector,
    rating_value: Selector,
    author_name: Selector,
    author_header: Selector,
    review_body: Selector,
    badge: Selector,
    badge_text: Selector,
    ratings_table: Selector,
    ratings_row: Selector,
    rating_header: Selector,
    rating_stars: Selector,
    filled_star: Selector,
    rating_value_cell: Selector,
}

impl ReviewSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            review: create_selector(r#"article[itemprop="review"]"#)?,
            date_published: create_selector(r#"meta[itemprop="datePublished"]"#)?,
            rating_value: create_selector(r#"span[itemprop="ratingValue"]"#)?,
            author_name: create_selector(r#"span[itemprop="name"]"#)?,
            author_header: create_selector("h3.text_sub_header.userStatusWrapper")?,
            review_body: create_selector(r#"div[itemprop="reviewBody"]"#)?,
            badge: create_selector("div.tc_mobile")?,
            badge_text: create_selector("strong")?,
            ratings_table: create_selector("table.review-ratings")?,
            ratings_row: create_selector("tr")?,
            rating_header: create_selector("td.review-rating-header")?,
            rating_stars: create_selector("td.review-rating-stars")?,
            filled_star: create_selector("span.star.fill")?,
            rating_value_cell: create_selector("td.review-value")?,
        })
    }
}

/// Parses one page's HTML on the blocking pool and extracts its reviews.
/// A page without reviews yields an empty `Vec`, not an error.
pub(crate) async fn parse_page(page: usize, html: String) -> Result<Vec<ReviewRecord>> {
    spawn_blocking(move || -> Result<Vec<ReviewRecord>> {
        let doc = Html::parse_document(&html);
        extract_reviews(&doc)
    })
    .await
    .map_err(|e| Error::Parse {
        page,
        reason: e.to_string(),
    })?
}

/// Extracts one record per `article[itemprop="review"]`, in document order.
///
/// Missing sub-elements never fail extraction: the affected field is simply
/// absent. The only error is a selector that does not compile.
pub fn extract_reviews(doc: &Html) -> Result<Vec<ReviewRecord>> {
    let sel = ReviewSelectors::new()?;

    let reviews = doc
        .select(&sel.review)
        .map(|article| extract_review(&sel, article))
        .collect();
    Ok(reviews)
}

fn extract_review(sel: &ReviewSelectors, article: ElementRef<'_>) -> ReviewRecord {
    let mut review = ReviewRecord::new();

    review.insert(
        "date_published",
        try_attr(article, &sel.date_published, "content").map(FieldValue::Text),
    );
    review.insert(
        "rating_value",
        try_text(article, &sel.rating_value).map(FieldValue::Text),
    );
    review.insert(
        "author_name",
        try_text(article, &sel.author_name).map(FieldValue::Text),
    );
    review.insert(
        "author_location",
        try_text(article, &sel.author_header)
            .map(|header| FieldValue::Text(author_location(&header))),
    );
    review.insert(
        "review_text",
        try_text(article, &sel.review_body).map(FieldValue::Text),
    );

    // Only a non-empty badge creates the column; anything not claiming
    // verification is left empty rather than copied.
    if let Some(badge) = article
        .select(&sel.badge)
        .next()
        .and_then(|div| try_text(div, &sel.badge_text))
        .filter(|text| !text.is_empty())
    {
        let verified = claims_verification(&badge).then_some(badge);
        review.insert("verified", verified.map(FieldValue::Text));
    }

    if let Some(table) = article.select(&sel.ratings_table).next() {
        for row in table.select(&sel.ratings_row) {
            let Some(header) = try_text(row, &sel.rating_header) else {
                continue;
            };
            review.insert(normalize_header(&header), rating_value(sel, row));
        }
    }

    review
}

/// Star widget first, then a plain value cell, otherwise nothing.
fn rating_value(sel: &ReviewSelectors, row: ElementRef<'_>) -> Option<FieldValue> {
    if let Some(stars) = row.select(&sel.rating_stars).next() {
        let filled = stars.select(&sel.filled_star).count();
        return Some(u32::try_from(filled).unwrap_or(u32::MAX).into());
    }
    try_text(row, &sel.rating_value_cell).map(FieldValue::Text)
}

/// Case-insensitive "verified", unless the badge negates it.
fn claims_verification(badge: &str) -> bool {
    let badge = badge.to_lowercase();
    badge.contains("verified") && !badge.contains("not verified") && !badge.contains("unverified")
}

/// Trimmed text of the first match below `scope`.
#[inline]
fn try_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

/// Attribute value of the first match below `scope`.
#[inline]
fn try_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

/// "Jane Doe (United Kingdom)" -> "United Kingdom".
fn author_location(header: &str) -> String {
    let tail = header.trim().rsplit('(').next().unwrap_or_default();
    tail.trim_end_matches(')').trim().to_string()
}

/// "Seat Comfort" -> "seat_comfort".
#[inline]
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::Selector(sel_str.into()))
}
