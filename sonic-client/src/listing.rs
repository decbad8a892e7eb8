//! ListObjectsV2 response parsing
//!
//! Only the elements needed to page through keys are read: `Key`,
//! `IsTruncated` and `NextContinuationToken`.

use quick_xml::Reader;
use quick_xml::events::Event;

/// One page of a bucket listing
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// Token for the next page, present only when the listing is truncated
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Key,
    IsTruncated,
    NextToken,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"Key" => Some(Self::Key),
            b"IsTruncated" => Some(Self::IsTruncated),
            b"NextContinuationToken" => Some(Self::NextToken),
            _ => None,
        }
    }
}

/// Parses a `ListBucketResult` document
///
/// Entity and character references are decoded and CDATA sections are taken
/// verbatim. Returns the parser's message on malformed XML.
pub fn parse_list_page(xml: &str) -> Result<ListPage, String> {
    let mut reader = Reader::from_str(xml);

    let mut keys = Vec::new();
    let mut truncated = false;
    let mut next_token = None;

    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => {
                field = Field::from_tag(e.name().as_ref());
                text.clear();
            }
            Event::Text(e) if field.is_some() => {
                text.push_str(&e.unescape().map_err(|e| e.to_string())?);
            }
            Event::CData(e) if field.is_some() => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::End(e) => {
                let Some(done) = field.take() else {
                    continue;
                };
                if Field::from_tag(e.name().as_ref()) != Some(done) {
                    continue;
                }

                let value = std::mem::take(&mut text);
                match done {
                    Field::Key => keys.push(value),
                    Field::IsTruncated => truncated = value.trim() == "true",
                    Field::NextToken => next_token = Some(value),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ListPage {
        keys,
        next_token: next_token.filter(|_| truncated),
    })
}
