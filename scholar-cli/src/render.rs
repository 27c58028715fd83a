//! Plain-text rendering of papers, pages, and filters.

use scholar_core::pagination::{FeedWindow, Page};
use scholar_core::{FilterCategory, FilterSelection, Paper};

const WRAP_WIDTH: usize = 78;
const FAVORITE_MARK: &str = "★";
const PLAIN_MARK: &str = " ";

/// One-line summary of where and when a paper appeared.
pub fn byline(paper: &Paper) -> String {
    let mut parts = Vec::new();
    if !paper.authors.is_empty() {
        parts.push(paper.author_names());
    }
    if let Some(venue) = paper.venue() {
        parts.push(venue.to_string());
    }
    if let Some(year) = paper.year() {
        parts.push(year.to_string());
    }
    if paper.citations > 0 {
        parts.push(format!("{} citations", paper.citations));
    }
    parts.join(" · ")
}

/// A result list entry: marker, id and title, then the byline.
pub fn paper_line(paper: &Paper, favorite: bool) -> String {
    let mark = if favorite { FAVORITE_MARK } else { PLAIN_MARK };
    format!("{} [{}] {}\n      {}", mark, paper.id, paper.title, byline(paper))
}

pub fn result_page(page: &Page<&Paper>, is_favorite: impl Fn(&str) -> bool) -> String {
    let mut out = String::new();
    if page.items.is_empty() {
        out.push_str("No papers match.\n");
        return out;
    }
    for paper in &page.items {
        out.push_str(&format!("{}\n", paper_line(paper, is_favorite(&paper.id))));
    }
    out.push_str(&format!(
        "\nPage {} of {} ({} results)\n",
        page.page, page.total_pages, page.total_items
    ));
    if page.has_next() {
        out.push_str(&format!("Next page: --page {}\n", page.page + 1));
    }
    out
}

/// Footer for one page of live results.
pub fn feed_footer(window: &FeedWindow, shown: usize) -> String {
    let mut out = if window.fetched == 0 {
        format!("Page {}: no results", window.page_number())
    } else {
        format!(
            "Page {}: results {}-{}",
            window.page_number(),
            window.start + 1,
            window.start + window.fetched
        )
    };
    if let Some(total) = window.total_results {
        out.push_str(&format!(" of {}", total));
    }
    if shown < window.fetched {
        out.push_str(&format!(" ({} after filters)", shown));
    }
    if window.has_more() {
        out.push_str(&format!("\nMore results: --page {}", window.page_number() + 1));
    }
    out
}

/// Full detail view of one paper.
pub fn paper_details(paper: &Paper, favorite: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", paper.title));
    out.push_str(&format!("{}\n", "=".repeat(paper.title.chars().count().min(WRAP_WIDTH))));
    out.push_str(&format!("id:         {}\n", paper.id));
    out.push_str(&format!("published:  {}\n", paper.publish_date));
    if let Some(venue) = paper.venue() {
        out.push_str(&format!("venue:      {}\n", venue));
    }
    out.push_str(&format!("citations:  {}\n", paper.citations));
    if let Some(category) = paper.primary_category.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&format!("category:   {}\n", category));
    }
    if !paper.tags.is_empty() {
        out.push_str(&format!("tags:       {}\n", paper.tags.join(", ")));
    }
    out.push_str(&format!("favorite:   {}\n", if favorite { "yes" } else { "no" }));

    out.push_str("\nAuthors\n");
    for author in &paper.authors {
        match &author.institution {
            Some(institution) => {
                out.push_str(&format!("  - {} ({})\n", author.name, institution))
            }
            None => out.push_str(&format!("  - {}\n", author.name)),
        }
    }

    out.push_str("\nAbstract\n");
    for line in textwrap::wrap(&paper.abstract_text, WRAP_WIDTH - 2) {
        out.push_str(&format!("  {}\n", line));
    }

    out.push('\n');
    if !paper.url.is_empty() {
        out.push_str(&format!("url:        {}\n", paper.url));
    }
    if let Some(pdf) = &paper.pdf_url {
        out.push_str(&format!("pdf:        {}\n", pdf));
    }
    out
}

/// Filter categories with the compound keys `--filter` accepts.
pub fn filter_list(categories: &[FilterCategory]) -> String {
    let mut out = String::new();
    for category in categories {
        out.push_str(&format!("{}\n", category.name));
        for option in &category.options {
            let key = format!("{}-{}", category.id, option.id);
            out.push_str(&format!("  {:<26} {}\n", key, option.label));
        }
    }
    out
}

/// Active filters as a single line, or `None` when nothing is selected.
pub fn active_filters(selection: &FilterSelection) -> Option<String> {
    (!selection.is_empty()).then(|| format!("Filters: {}", selection.to_compound_keys().join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scholar_core::dataset::{filter_categories, sample_papers};
    use scholar_core::paginate;
    use std::num::NonZeroUsize;

    #[test]
    fn test_byline() {
        let paper = &sample_papers()[0];
        assert_eq!(
            byline(paper),
            "Kai Han, Yunhe Wang, Jianyuan Guo · CVPR · 2023 · 145 citations"
        );
    }

    #[test]
    fn test_paper_line_marks_favorites() {
        let paper = &sample_papers()[1];
        assert!(paper_line(paper, true).starts_with("★ [2] Real-time Object Detection"));
        assert!(paper_line(paper, false).starts_with("  [2]"));
    }

    #[test]
    fn test_result_page_footer() {
        let papers = sample_papers();
        let refs: Vec<&Paper> = papers.iter().collect();
        let page = paginate(&refs, NonZeroUsize::new(2).unwrap(), 2);
        let out = result_page(&page, |id| id == "3");
        assert!(out.contains("★ [3]"));
        assert!(out.contains("Page 2 of 3 (5 results)\nNext page: --page 3"));
        assert!(!out.contains("[1]"));
    }

    #[test]
    fn test_result_page_empty() {
        let page = paginate::<&Paper>(&[], NonZeroUsize::MIN, 1);
        assert_eq!(result_page(&page, |_| false), "No papers match.\n");
    }

    #[test]
    fn test_feed_footer() {
        let size = NonZeroUsize::new(25).unwrap();
        let full = FeedWindow::new(25, size).with_fetched(25, None);
        assert_eq!(
            feed_footer(&full, 25),
            "Page 2: results 26-50\nMore results: --page 3"
        );

        let short = FeedWindow::new(0, size).with_fetched(4, Some(4));
        assert_eq!(feed_footer(&short, 1), "Page 1: results 1-4 of 4 (1 after filters)");
    }

    #[test]
    fn test_paper_details_wraps_abstract() {
        let paper = &sample_papers()[2];
        let out = paper_details(paper, false);
        assert!(out.starts_with("Self-Supervised Learning for Medical Image Segmentation\n"));
        assert!(out.contains("venue:      Medical Image Analysis"));
        assert!(out.contains("  - Emma Johnson (Stanford University)"));
        assert!(out.contains("favorite:   no"));
        assert!(out.lines().all(|line| line.chars().count() <= WRAP_WIDTH));
    }

    #[test]
    fn test_filter_list() {
        let out = filter_list(&filter_categories());
        assert!(out.starts_with("Conference\n  conference-cvpr "));
        assert!(out.contains("  topic-object-detection     Object Detection"));
    }

    #[test]
    fn test_active_filters() {
        let mut selection = FilterSelection::new();
        assert_eq!(active_filters(&selection), None);
        selection.select("topic", "3d");
        selection.select("conference", "cvpr");
        assert_eq!(
            active_filters(&selection).as_deref(),
            Some("Filters: conference-cvpr, topic-3d")
        );
    }
}
