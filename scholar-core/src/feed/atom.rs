//! Atom XML parser for arXiv query responses.
//!
//! Element names are matched on their local part, so `arxiv:primary_category`
//! and `opensearch:totalResults` work regardless of the prefix the server
//! binds. Parsing never fails: a malformed document stops the reader and the
//! entries completed up to that point are returned.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{FeedAuthor, FeedEntry, FeedLink, FeedPage};

/// Leaf elements whose text content is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
    Updated,
    AuthorName,
    Doi,
    JournalRef,
    Comment,
    TotalResults,
    StartIndex,
    ItemsPerPage,
}

impl Field {
    fn from_local(name: &[u8], in_entry: bool, in_author: bool) -> Option<Self> {
        if !in_entry {
            return match name {
                b"totalResults" => Some(Field::TotalResults),
                b"startIndex" => Some(Field::StartIndex),
                b"itemsPerPage" => Some(Field::ItemsPerPage),
                _ => None,
            };
        }
        match name {
            b"name" if in_author => Some(Field::AuthorName),
            b"id" => Some(Field::Id),
            b"title" => Some(Field::Title),
            b"summary" => Some(Field::Summary),
            b"published" => Some(Field::Published),
            b"updated" => Some(Field::Updated),
            b"doi" => Some(Field::Doi),
            b"journal_ref" => Some(Field::JournalRef),
            b"comment" => Some(Field::Comment),
            _ => None,
        }
    }
}

#[derive(Default)]
struct AtomParser {
    page: FeedPage,
    entry: Option<FeedEntry>,
    in_author: bool,
    field: Option<Field>,
    text: String,
}

impl AtomParser {
    fn handle_start(&mut self, e: &BytesStart<'_>) {
        let local = e.local_name();
        match local.as_ref() {
            b"entry" => {
                self.entry = Some(FeedEntry::default());
            }
            b"author" => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.authors.push(FeedAuthor::default());
                    self.in_author = true;
                }
            }
            b"link" | b"category" | b"primary_category" => self.handle_empty(e),
            name => {
                self.field = Field::from_local(name, self.entry.is_some(), self.in_author);
                self.text.clear();
            }
        }
    }

    fn handle_empty(&mut self, e: &BytesStart<'_>) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        let local = e.local_name();
        match local.as_ref() {
            b"link" => entry.links.push(FeedLink {
                href: attribute(e, b"href"),
                rel: attribute(e, b"rel"),
                title: attribute(e, b"title"),
                media_type: attribute(e, b"type"),
            }),
            b"category" => {
                if let Some(term) = attribute(e, b"term") {
                    entry.categories.push(term);
                }
            }
            b"primary_category" => {
                entry.primary_category = attribute(e, b"term");
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if self.field.is_some() {
            self.text.push_str(text);
        }
    }

    fn handle_end(&mut self, local: &[u8]) {
        match local {
            b"entry" => {
                if let Some(entry) = self.entry.take() {
                    self.page.entries.push(entry);
                }
                self.in_author = false;
                self.field = None;
            }
            b"author" => {
                self.in_author = false;
            }
            _ => {
                if let Some(field) = self.field.take() {
                    let text = std::mem::take(&mut self.text);
                    self.commit(field, text);
                }
            }
        }
    }

    fn commit(&mut self, field: Field, text: String) {
        let value = text.trim().to_string();
        match field {
            Field::TotalResults => self.page.total_results = value.parse().ok(),
            Field::StartIndex => self.page.start_index = value.parse().ok(),
            Field::ItemsPerPage => self.page.items_per_page = value.parse().ok(),
            _ => {
                let Some(entry) = self.entry.as_mut() else {
                    return;
                };
                let slot = match field {
                    Field::Id => &mut entry.id_uri,
                    Field::Title => &mut entry.title,
                    Field::Summary => &mut entry.summary,
                    Field::Published => &mut entry.published,
                    Field::Updated => &mut entry.updated,
                    Field::Doi => &mut entry.doi,
                    Field::JournalRef => &mut entry.journal_ref,
                    Field::Comment => &mut entry.comment,
                    Field::AuthorName => match entry.authors.last_mut() {
                        Some(author) => &mut author.name,
                        None => return,
                    },
                    Field::TotalResults | Field::StartIndex | Field::ItemsPerPage => return,
                };
                // First occurrence wins, matching element lookup by tag name.
                if slot.is_none() {
                    *slot = Some(value);
                }
            }
        }
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Parse an Atom feed body into raw entries and paging metadata.
pub fn parse_atom_feed(xml: &str) -> FeedPage {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut parser = AtomParser::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => parser.handle_start(e),
            Ok(Event::Empty(ref e)) => parser.handle_empty(e),
            Ok(Event::Text(ref e)) => match e.unescape() {
                Ok(text) => parser.handle_text(&text),
                Err(err) => {
                    tracing::warn!(error = %err, "Skipping undecodable text in feed");
                }
            },
            Ok(Event::CData(ref e)) => parser.handle_text(&String::from_utf8_lossy(e)),
            Ok(Event::End(ref e)) => parser.handle_end(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(err) => {
                tracing::warn!(
                    position = reader.buffer_position(),
                    error = %err,
                    parsed = parser.page.entries.len(),
                    "Malformed feed document, keeping entries parsed so far"
                );
                break;
            }
            _ => {}
        }
    }

    tracing::debug!(entries = parser.page.entries.len(), "Parsed Atom feed");
    parser.page
}
