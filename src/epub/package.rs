//! In-memory EPUB package built from a [Document]: metadata, one chapter, stylesheet, navigation.

use crate::model::{Document, Layout};

/// Language tag written to the package and the chapter.
pub const LANGUAGE: &str = "zh-TW";
/// Fixed `dc:creator`.
pub const AUTHOR: &str = "URL to EPUB Converter";
/// Text in front of the source link on the chapter page.
pub const SOURCE_LABEL: &str = "來源：";

pub const NAV_ID: &str = "nav";
pub const NAV_FILE: &str = "nav.xhtml";
pub const NCX_FILE: &str = "toc.ncx";
pub const CHAPTER_ID: &str = "chapter1";
pub const CHAPTER_FILE: &str = "chapter1.xhtml";
pub const STYLESHEET_FILE: &str = "style/book.css";

const MODIFIED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const BASE_CSS: &str = r#"body { font-family: "Times New Roman", "PingFang TC", "Microsoft YaHei", serif; line-height: 1.8; padding: 20px; }
h1 { text-align: center; color: #333; }
hr { margin: 20px 0; }
a { color: #0066cc; }
p.source { text-indent: 0; text-align: left; }
"#;

const PARAGRAPH_CSS: &str = "p { text-indent: 2em; margin-bottom: 0.5em; text-align: justify; }\n";

const PREFORMATTED_CSS: &str =
    "pre { white-space: pre-wrap; word-wrap: break-word; font-family: inherit; line-height: 1.8; }\n";

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub label: String,
    pub href: String,
}

/// Everything the writer needs; built by [Package::from_document].
#[derive(Debug, Clone)]
pub struct Package {
    /// Stable for a given source URL.
    pub identifier: String,
    pub title: String,
    pub language: &'static str,
    pub author: &'static str,
    /// `dcterms:modified` value, UTC, second precision.
    pub modified: String,
    pub source_url: String,
    /// Full XHTML of the single chapter.
    pub chapter: String,
    pub stylesheet: String,
    /// Always exactly one entry, pointing at the chapter.
    pub toc: Vec<TocEntry>,
    /// Manifest ids in reading order: navigation, then the chapter.
    pub spine: Vec<&'static str>,
}

impl Package {
    pub fn from_document(doc: &Document) -> Self {
        let stylesheet = match doc.layout {
            Layout::Paragraphs => format!("{}{}", BASE_CSS, PARAGRAPH_CSS),
            Layout::Preformatted => format!("{}{}", BASE_CSS, PREFORMATTED_CSS),
        };
        Package {
            identifier: identifier_for(&doc.source_url),
            title: doc.title.clone(),
            language: LANGUAGE,
            author: AUTHOR,
            modified: modified_now(),
            source_url: doc.source_url.clone(),
            chapter: chapter_xhtml(doc),
            stylesheet,
            toc: vec![TocEntry {
                label: doc.title.clone(),
                href: CHAPTER_FILE.to_string(),
            }],
            spine: vec![NAV_ID, CHAPTER_ID],
        }
    }

    /// `content.opf` for this package (EPUB 3 with an NCX for older readers).
    pub fn opf(&self) -> String {
        let spine = self
            .spine
            .iter()
            .map(|id| format!("    <itemref idref=\"{}\"/>", id))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="book-id" version="3.0" xml:lang="{lang}">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="book-id">{id}</dc:identifier>
    <dc:title>{title}</dc:title>
    <dc:creator>{creator}</dc:creator>
    <dc:language>{lang}</dc:language>
    <dc:source>{source}</dc:source>
    <meta property="dcterms:modified">{modified}</meta>
  </metadata>
  <manifest>
    <item id="{nav_id}" href="{nav}" media-type="application/xhtml+xml" properties="nav"/>
    <item id="ncx" href="{ncx}" media-type="application/x-dtbncx+xml"/>
    <item id="{chapter_id}" href="{chapter}" media-type="application/xhtml+xml"/>
    <item id="style" href="{css}" media-type="text/css"/>
  </manifest>
  <spine toc="ncx">
{spine}
  </spine>
</package>
"#,
            lang = self.language,
            id = xml_escape(&self.identifier),
            title = xml_escape(&self.title),
            creator = xml_escape(self.author),
            source = xml_escape(&self.source_url),
            modified = xml_escape(&self.modified),
            nav_id = NAV_ID,
            nav = NAV_FILE,
            ncx = NCX_FILE,
            chapter_id = CHAPTER_ID,
            chapter = CHAPTER_FILE,
            css = STYLESHEET_FILE,
            spine = spine,
        )
    }

    /// EPUB 3 navigation document listing the TOC entries.
    pub fn nav(&self) -> String {
        let links = self
            .toc
            .iter()
            .map(|e| {
                format!(
                    "      <li><a href=\"{}\">{}</a></li>",
                    xml_escape(&e.href),
                    xml_escape(&e.label)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}">
<head>
  <meta charset="UTF-8"/>
  <title>{title}</title>
</head>
<body>
  <nav epub:type="toc" id="toc">
    <h1>{title}</h1>
    <ol>
{links}
    </ol>
  </nav>
</body>
</html>
"#,
            lang = self.language,
            title = xml_escape(&self.title),
            links = links,
        )
    }

    /// EPUB 2 `toc.ncx` mirroring [Package::nav].
    pub fn ncx(&self) -> String {
        let points = self
            .toc
            .iter()
            .enumerate()
            .map(|(i, e)| {
                format!(
                    r#"    <navPoint id="navpoint-{n}" playOrder="{n}">
      <navLabel><text>{label}</text></navLabel>
      <content src="{href}"/>
    </navPoint>"#,
                    n = i + 1,
                    label = xml_escape(&e.label),
                    href = xml_escape(&e.href),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="{uid}"/>
  </head>
  <docTitle>
    <text>{title}</text>
  </docTitle>
  <navMap>
{points}
  </navMap>
</ncx>
"#,
            uid = xml_escape(&self.identifier),
            title = xml_escape(&self.title),
            points = points,
        )
    }
}

/// Current UTC time in the form EPUB 3 requires for `dcterms:modified`.
fn modified_now() -> String {
    chrono::Utc::now().format(MODIFIED_FORMAT).to_string()
}

/// `url2epub_` followed by the SHA-1 of the URL.
pub fn identifier_for(source_url: &str) -> String {
    format!("url2epub_{}", sha1_smol::Sha1::from(source_url).hexdigest())
}

fn chapter_xhtml(doc: &Document) -> String {
    let title = xml_escape(&doc.title);
    let url = xml_escape(&doc.source_url);
    let mut content = String::new();
    match doc.layout {
        Layout::Paragraphs => {
            for block in doc.blocks.iter().filter(|b| !b.trim().is_empty()) {
                content.push_str(&format!("  <p>{}</p>\n", xml_escape(block)));
            }
        }
        Layout::Preformatted => {
            if !doc.blocks.is_empty() {
                content.push_str(&format!("  <pre>{}</pre>\n", xml_escape(&doc.blocks.join("\n"))));
            }
        }
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}" lang="{lang}">
<head>
  <meta charset="UTF-8"/>
  <title>{title}</title>
  <link rel="stylesheet" type="text/css" href="{css}"/>
</head>
<body>
  <h1>{title}</h1>
  <p class="source">{label}<a href="{url}">{url}</a></p>
  <hr/>
{content}</body>
</html>
"#,
        lang = LANGUAGE,
        title = title,
        css = STYLESHEET_FILE,
        label = SOURCE_LABEL,
        url = url,
        content = content,
    )
}

/// Escape markup characters and drop code points XML 1.0 does not allow.
pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}
