//! HTML binding: writes shaped sections into named mount points.
//!
//! A `MountSet` stands in for the page: mounts that exist keep whatever
//! content they last received; sections whose mount is missing, or whose
//! data was absent, leave the mount untouched. Binding the same sections
//! twice yields identical content.

use std::collections::BTreeMap;

use crate::render::{Block, Section, SECTION_MOUNTS};
use crate::report::ResearchSource;

/// Named mount points and their current content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MountSet {
    mounts: BTreeMap<String, String>,
}

impl MountSet {
    /// A page with all fourteen known mounts, empty.
    pub fn full_page() -> Self {
        let mut set = Self::default();
        for id in SECTION_MOUNTS {
            set.add_mount(id);
        }
        set
    }

    pub fn add_mount(&mut self, id: &str) {
        self.mounts.entry(id.to_string()).or_default();
    }

    pub fn has_mount(&self, id: &str) -> bool {
        self.mounts.contains_key(id)
    }

    pub fn content(&self, id: &str) -> Option<&str> {
        self.mounts.get(id).map(|s| s.as_str())
    }

    fn set_content(&mut self, id: &str, html: String) {
        if let Some(slot) = self.mounts.get_mut(id) {
            *slot = html;
        }
    }

    /// Concatenated content of every non-empty mount, in page order.
    pub fn to_document(&self, heading: &str) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head><meta charset=\"UTF-8\">");
        out.push_str(&format!("<title>{}</title></head>\n<body>\n", escape(heading)));
        for id in SECTION_MOUNTS {
            if let Some(content) = self.mounts.get(id) {
                if !content.is_empty() {
                    out.push_str(&format!("<div id=\"{}\">{}</div>\n", id, content));
                }
            }
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

/// Bind sections into their mounts. Mounts without a matching section keep
/// their prior content.
pub fn bind(mounts: &mut MountSet, sections: &[Section]) {
    for section in sections {
        if !mounts.has_mount(section.mount) {
            continue;
        }
        mounts.set_content(section.mount, render_section(section));
    }
}

fn render_section(section: &Section) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"result-section\">");
    out.push_str(&format!("<h4>{}</h4>", escape(&section.title)));
    for block in &section.blocks {
        out.push_str(&render_block(block));
    }
    out.push_str("</div>");
    out
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Card { title, items } => {
            let mut out = format!("<div class=\"avatar-card\"><h5>{}</h5>", escape(title));
            for (label, value) in items {
                out.push_str(&format!(
                    "<div class=\"avatar-item\"><span class=\"avatar-label\">{}</span><span class=\"avatar-value\">{}</span></div>",
                    escape(label),
                    escape(value)
                ));
            }
            out.push_str("</div>");
            out
        }
        Block::List { title, items } => {
            let mut out = format!("<h5>{}</h5><ul class=\"insight-list\">", escape(title));
            for item in items {
                out.push_str(&format!("<li class=\"insight-item\">{}</li>", escape(item)));
            }
            out.push_str("</ul>");
            out
        }
        Block::Driver { name, trigger, definition, script, anchors } => {
            let mut out = format!("<div class=\"driver-card\"><h4>{}</h4>", escape(name));
            out.push_str(&format!(
                "<p><strong>Gatilho Central:</strong> {}</p>",
                escape(trigger)
            ));
            out.push_str(&format!("<p><strong>Definição:</strong> {}</p>", escape(definition)));
            if let Some(script) = script {
                out.push_str("<div class=\"driver-script\"><h6>Roteiro de Ativação</h6>");
                out.push_str(&format!(
                    "<p><strong>Pergunta:</strong> {}</p>",
                    escape(&script.pergunta_abertura)
                ));
                out.push_str(&format!(
                    "<p><strong>História:</strong> {}</p>",
                    escape(&script.historia_analogia)
                ));
                out.push_str(&format!(
                    "<p><strong>Comando:</strong> {}</p>",
                    escape(&script.comando_acao)
                ));
                out.push_str("</div>");
            }
            if !anchors.is_empty() {
                out.push_str("<div class=\"anchor-phrases\"><h6>Frases de Ancoragem</h6><ul>");
                for phrase in anchors {
                    out.push_str(&format!("<li>\"{}\"</li>", escape(phrase)));
                }
                out.push_str("</ul></div>");
            }
            out.push_str("</div>");
            out
        }
        Block::Numbered(items) => {
            let mut out = String::from("<div class=\"insights-showcase\">");
            for (i, item) in items.iter().enumerate() {
                out.push_str(&format!(
                    "<div class=\"insight-card\"><div class=\"insight-number\">{}</div><div class=\"insight-content\">{}</div></div>",
                    i + 1,
                    escape(item)
                ));
            }
            out.push_str("</div>");
            out
        }
        Block::Counters(items) => {
            let mut out = String::from("<div class=\"stats-grid\">");
            for (label, value) in items {
                out.push_str(&format!(
                    "<div class=\"stat-item\"><span class=\"stat-label\">{}</span><span class=\"stat-value\">{}</span></div>",
                    escape(label),
                    escape(value)
                ));
            }
            out.push_str("</div>");
            out
        }
        Block::Sources(sources) => {
            let mut out = String::from("<div class=\"results-list\">");
            for ResearchSource { title, url, source } in sources {
                out.push_str(&format!(
                    "<div class=\"result-item\"><h5>{}</h5><div class=\"result-url\">{}</div><div class=\"result-source\">Fonte: {}</div></div>",
                    escape(title),
                    escape(url),
                    escape(source)
                ));
            }
            out.push_str("</div>");
            out
        }
        Block::Paragraph(text) => format!("<p>{}</p>", escape(text)),
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
