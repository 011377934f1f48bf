//! Text and HTML renderings of a [SearchView].

use std::fmt::Write as _;

use crate::search::{FontWeight, SearchView};

/// Plain-text rendering for terminals. Thin lines are indented so regular-weight powers stand out.
pub fn text(view: &SearchView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.label);
    if view.disabled {
        let _ = writeln!(out, "  (loading…)");
    }

    let selected: Vec<&str> = view
        .items
        .iter()
        .filter(|item| item.selected)
        .map(|item| item.label.as_str())
        .collect();
    if selected.is_empty() {
        let _ = writeln!(out, "  {}", view.placeholder);
    } else {
        let _ = writeln!(out, "  [{}]", selected.join(", "));
    }

    if let Some(results) = &view.results {
        let _ = writeln!(out);
        for line in results {
            match line.weight {
                FontWeight::Regular => {
                    let _ = writeln!(out, "{}", line.text);
                }
                FontWeight::Thin => {
                    let _ = writeln!(out, "  {}", line.text);
                }
            }
        }
    }
    out
}

/// HTML fragment for the widget. The selector is a plain multi-select form so it works
/// without scripting; the result panel is omitted while nothing is selected.
pub fn html(view: &SearchView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<form class=\"search\" method=\"get\" action=\"/search\">");
    let _ = writeln!(out, "  <label for=\"effects\">{}</label>", escape(&view.label));
    let _ = writeln!(
        out,
        "  <select id=\"effects\" name=\"effects\"{}{} style=\"width:100%;max-height:300px\">",
        if view.multiple { " multiple" } else { "" },
        if view.disabled { " disabled" } else { "" },
    );
    if view.items.is_empty() {
        let _ = writeln!(out, "    <option value=\"\" disabled>{}</option>", escape(&view.placeholder));
    }
    for item in &view.items {
        let _ = writeln!(
            out,
            "    <option value=\"{}\"{}>{}{}</option>",
            escape(&item.value),
            if item.selected { " selected" } else { "" },
            escape(&item.label),
            if item.selected { " ✓" } else { "" },
        );
    }
    let _ = writeln!(out, "  </select>");
    let _ = writeln!(out, "  <button type=\"submit\">Search</button>");
    let _ = writeln!(out, "  <a href=\"/search\">Clear</a>");
    let _ = writeln!(out, "</form>");

    if let Some(results) = &view.results {
        let _ = writeln!(out, "<div class=\"results\">");
        for line in results {
            let class = match line.weight {
                FontWeight::Regular => "regular",
                FontWeight::Thin => "thin",
            };
            let _ = writeln!(out, "  <p class=\"{class}\">{}</p>", escape(&line.text));
        }
        let _ = writeln!(out, "</div>");
    }
    out
}

pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
