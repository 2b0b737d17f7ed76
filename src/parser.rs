use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Teaser cap in characters. The kiosk shows headline and teaser only;
/// full content stays with the publisher.
pub const TEASER_MAX_CHARS: usize = 200;

/// Raw candidate record pulled out of one feed document, before
/// classification and source attribution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub date: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FeedKind {
    Rss,
    Atom,
}

impl FeedKind {
    fn record_tag(&self) -> &'static [u8] {
        match self {
            FeedKind::Rss => b"item",
            FeedKind::Atom => b"entry",
        }
    }
}

/// Parse one feed body into candidate records. Documents containing
/// `<entry` blocks are read as Atom, everything else as RSS. A body
/// that is neither yields an empty list, not an error.
pub fn parse_feed(body: &str) -> Vec<RawItem> {
    if body.contains("<entry") {
        scan(body, FeedKind::Atom)
    } else {
        scan(body, FeedKind::Rss)
    }
}

/// Field slots collected per record. First occurrence wins for each.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Title,
    LinkText,
    Guid,
    Date,
    DateFallback,
    Summary,
    Content,
}

#[derive(Debug, Default)]
struct Draft {
    title: String,
    link_text: String,
    /// Atom href with rel="alternate" or no rel
    link_href: String,
    /// Atom href with any other rel, last resort before element text
    link_href_any: String,
    guid: String,
    date: String,
    date_fallback: String,
    summary: String,
    content: String,
}

impl Draft {
    /// Clean the collected fields and decide whether the record
    /// survives. Entries without both title and link are expected feed
    /// noise and are silently dropped.
    fn into_item(self) -> Option<RawItem> {
        let title = normalize_whitespace(&decode_entities(&self.title));

        let link_raw = [self.link_href, self.link_href_any, self.link_text]
            .into_iter()
            .find(|candidate| !candidate.trim().is_empty())
            .unwrap_or_default();
        let mut link = decode_entities(&link_raw).trim().to_string();
        if link.is_empty() {
            let guid = decode_entities(&self.guid).trim().to_string();
            if looks_like_url(&guid) {
                link = guid;
            }
        }

        if title.is_empty() || link.is_empty() {
            return None;
        }

        let date_raw = if self.date.trim().is_empty() {
            self.date_fallback
        } else {
            self.date
        };
        let date = decode_entities(&date_raw).trim().to_string();

        let description_raw = if self.summary.trim().is_empty() {
            self.content
        } else {
            self.summary
        };
        let description = teaser(&description_raw);

        Some(RawItem {
            title,
            link,
            date,
            description,
        })
    }
}

fn scan(body: &str, kind: FeedKind) -> Vec<RawItem> {
    let mut reader = Reader::from_str(body);
    // Feeds in the wild ship mismatched or missing close tags; one bad
    // tag must not fail the whole document.
    reader.config_mut().check_end_names = false;

    let mut items = Vec::new();
    let mut in_record = false;
    let mut draft = Draft::default();
    let mut capture: Option<Slot> = None;
    let mut buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                let name = name.as_ref();
                if name == kind.record_tag() {
                    // A record opening while one is still open means the
                    // previous one never closed; finish it first.
                    if in_record {
                        finish_record(&mut items, &mut draft, &mut capture, &mut buf);
                    }
                    in_record = true;
                    draft = Draft::default();
                } else if in_record && capture.is_none() {
                    if kind == FeedKind::Atom && name == b"link" {
                        if !take_link_href(&e, &mut draft) {
                            capture = Some(Slot::LinkText);
                            buf.clear();
                        }
                    } else if let Some(slot) = slot_for(kind, name) {
                        capture = Some(slot);
                        buf.clear();
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                let name = e.local_name();
                let name = name.as_ref();
                if in_record && capture.is_none() && kind == FeedKind::Atom && name == b"link" {
                    take_link_href(&e, &mut draft);
                }
            }
            Ok(Event::Text(t)) => {
                if in_record && capture.is_some() {
                    buf.push_str(&String::from_utf8_lossy(t.as_ref()));
                }
            }
            Ok(Event::CData(t)) => {
                if in_record && capture.is_some() {
                    buf.push_str(&String::from_utf8_lossy(t.as_ref()));
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                let name = name.as_ref();
                if name == kind.record_tag() {
                    if in_record {
                        finish_record(&mut items, &mut draft, &mut capture, &mut buf);
                        in_record = false;
                    }
                } else if in_record {
                    if let Some(slot) = capture {
                        if slot_matches(kind, slot, name) {
                            commit(&mut draft, slot, &buf);
                            capture = None;
                            buf.clear();
                        }
                    }
                }
            }
            Ok(Event::Eof) => {
                // A truncated document keeps its trailing record
                if in_record {
                    finish_record(&mut items, &mut draft, &mut capture, &mut buf);
                }
                break;
            }
            Err(_) => {
                // Stop at the first unreadable byte sequence, keeping
                // everything collected up to it
                if in_record {
                    finish_record(&mut items, &mut draft, &mut capture, &mut buf);
                }
                break;
            }
            _ => {}
        }
    }

    items
}

fn finish_record(
    items: &mut Vec<RawItem>,
    draft: &mut Draft,
    capture: &mut Option<Slot>,
    buf: &mut String,
) {
    // An unclosed field at record end still counts
    if let Some(slot) = capture.take() {
        commit(draft, slot, buf);
    }
    buf.clear();

    if let Some(item) = std::mem::take(draft).into_item() {
        items.push(item);
    }
}

fn slot_for(kind: FeedKind, name: &[u8]) -> Option<Slot> {
    match kind {
        FeedKind::Rss => match name {
            b"title" => Some(Slot::Title),
            b"link" => Some(Slot::LinkText),
            b"guid" => Some(Slot::Guid),
            b"pubDate" => Some(Slot::Date),
            // dc:date with the prefix already stripped by local_name
            b"date" => Some(Slot::DateFallback),
            b"description" => Some(Slot::Summary),
            // content:encoded
            b"encoded" => Some(Slot::Content),
            _ => None,
        },
        FeedKind::Atom => match name {
            b"title" => Some(Slot::Title),
            b"id" => Some(Slot::Guid),
            b"updated" => Some(Slot::Date),
            b"published" => Some(Slot::DateFallback),
            b"summary" => Some(Slot::Summary),
            b"content" => Some(Slot::Content),
            _ => None,
        },
    }
}

fn slot_matches(kind: FeedKind, slot: Slot, name: &[u8]) -> bool {
    slot_for(kind, name) == Some(slot) || (slot == Slot::LinkText && name == b"link")
}

fn commit(draft: &mut Draft, slot: Slot, text: &str) {
    let target = match slot {
        Slot::Title => &mut draft.title,
        Slot::LinkText => &mut draft.link_text,
        Slot::Guid => &mut draft.guid,
        Slot::Date => &mut draft.date,
        Slot::DateFallback => &mut draft.date_fallback,
        Slot::Summary => &mut draft.summary,
        Slot::Content => &mut draft.content,
    };
    if target.is_empty() {
        *target = text.to_string();
    }
}

/// Pull `href` off an Atom `<link>`. Hrefs pointing at the article
/// (rel="alternate" or no rel) win over enclosure/self links. Returns
/// false when no href is present so the caller can fall back to
/// capturing element text.
fn take_link_href(e: &BytesStart<'_>, draft: &mut Draft) -> bool {
    let mut href = String::new();
    let mut rel = String::new();

    for attr in e.attributes().with_checks(false).flatten() {
        match attr.key.as_ref() {
            b"href" => href = String::from_utf8_lossy(&attr.value).to_string(),
            b"rel" => rel = String::from_utf8_lossy(&attr.value).to_string(),
            _ => {}
        }
    }

    if href.is_empty() {
        return false;
    }
    if rel.is_empty() || rel == "alternate" {
        if draft.link_href.is_empty() {
            draft.link_href = href;
        }
    } else if draft.link_href_any.is_empty() {
        draft.link_href_any = href;
    }
    true
}

/// Decode the HTML entities feeds actually ship. `&amp;` is decoded
/// first, so double-encoded text like `Sturmwarnung&amp;nbsp;Rheinland`
/// comes out clean in a single pass.
pub fn decode_entities(input: &str) -> String {
    let mut text = unwrap_cdata(input);
    text = text.replace("&amp;", "&");
    text = text.replace("&lt;", "<");
    text = text.replace("&gt;", ">");
    text = text.replace("&quot;", "\"");
    text = text.replace("&#39;", "'");
    text = text.replace("&apos;", "'");
    text = text.replace("&nbsp;", " ");
    decode_numeric_entities(&text)
}

fn unwrap_cdata(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("<![CDATA[") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 9..];
        match after.find("]]>") {
            Some(end) => {
                out.push_str(&after[..end]);
                rest = &after[end + 3..];
            }
            None => {
                // Unterminated wrapper: keep the content
                out.push_str(after);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode `&#123;` and `&#x1F4;` character references. Malformed
/// references stay as-is.
fn decode_numeric_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("&#") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let decoded = tail.find(';').and_then(|end| {
            let body = &tail[2..end];
            let code = if let Some(hex) = body.strip_prefix('x').or_else(|| body.strip_prefix('X'))
            {
                u32::from_str_radix(hex, 16).ok()
            } else {
                body.parse::<u32>().ok()
            };
            code.and_then(char::from_u32).map(|ch| (ch, end))
        });
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push_str("&#");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Remove HTML tags, keeping the text between them.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Collapse whitespace runs into single spaces and trim the ends.
pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn teaser(input: &str) -> Option<String> {
    let text = normalize_whitespace(&strip_tags(&decode_entities(input)));
    if text.is_empty() {
        return None;
    }
    if text.chars().count() <= TEASER_MAX_CHARS {
        return Some(text);
    }
    let mut cut: String = text.chars().take(TEASER_MAX_CHARS).collect();
    cut.push('…');
    Some(cut)
}

fn looks_like_url(candidate: &str) -> bool {
    candidate.starts_with("http://") || candidate.starts_with("https://")
}
