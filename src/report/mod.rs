//! HTML document shell.
//!
//! Static chrome around the grid engine's output: page structure, dark
//! styling, and a small header-click sort affordance for the emitted table.
//! All real filtering, sorting, and column logic happens in the engine
//! before rendering; the shell only presents the visible set it is handed.

use std::path::Path;

use chrono::Utc;

use crate::error::Result;
use crate::grid::GridSession;
use crate::model::ValueType;

const STYLE: &str = r#"
        body {
            font-family: Arial, sans-serif;
            margin: 20px;
            background-color: #121212;
            color: #ffffff;
        }
        table { border-collapse: collapse; width: 100%; }
        th, td { border: 1px solid #444; padding: 8px; text-align: left; }
        th { background-color: #333; cursor: pointer; }
        tr:nth-child(even) { background-color: #1e1e1e; }
        tr:hover { background-color: #333; }
        img { max-width: 50px; max-height: 50px; }
        .count { color: #aaaaaa; }
        footer { margin-top: 16px; color: #666; font-size: 12px; }
"#;

// Client-side resort of the already-rendered rows; mirrors the engine's
// comparator (numeric when both cells parse, case-insensitive otherwise).
const SCRIPT: &str = r#"
        document.addEventListener('DOMContentLoaded', function() {
            const table = document.querySelector('table');
            const headers = table.querySelectorAll('th');
            headers.forEach((header, index) => {
                header.addEventListener('click', () => {
                    const rows = Array.from(table.querySelectorAll('tbody tr'));
                    const ascending = header.dataset.order !== 'asc';
                    rows.sort((rowA, rowB) => {
                        const cellA = rowA.children[index].textContent.trim();
                        const cellB = rowB.children[index].textContent.trim();
                        if (!isNaN(cellA) && !isNaN(cellB) && cellA !== '' && cellB !== '') {
                            return ascending ? cellA - cellB : cellB - cellA;
                        }
                        return ascending
                            ? cellA.localeCompare(cellB, undefined, {sensitivity: 'base'})
                            : cellB.localeCompare(cellA, undefined, {sensitivity: 'base'});
                    });
                    header.dataset.order = ascending ? 'asc' : 'desc';
                    const tbody = table.querySelector('tbody');
                    tbody.innerHTML = '';
                    rows.forEach(row => tbody.appendChild(row));
                });
            });
        });
"#;

/// Render the session's visible set as a complete HTML document.
pub fn render(session: &GridSession, title: &str) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!("    <title>{}</title>\n", html_escape(title)));
    html.push_str(&format!("    <style>{STYLE}    </style>\n"));
    html.push_str(&format!("    <script>{SCRIPT}    </script>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("    <h1>{}</h1>\n", html_escape(title)));
    html.push_str(&format!(
        "    <p class=\"count\">{} tracks</p>\n",
        session.visible_count()
    ));

    html.push_str("    <table>\n        <thead>\n            <tr>\n");
    for column in session.catalog().visible_columns() {
        html.push_str(&format!(
            "                <th>{}</th>\n",
            html_escape(&column.label)
        ));
    }
    html.push_str("            </tr>\n        </thead>\n        <tbody>\n");

    for record in session.visible_records() {
        html.push_str("            <tr>");
        for column in session.catalog().visible_columns() {
            match column.value_type() {
                ValueType::Image => match &record.cover {
                    Some(path) => html.push_str(&format!(
                        "<td><img src=\"{}\" alt=\"Cover\"></td>",
                        html_escape(&path.to_string_lossy())
                    )),
                    None => html.push_str("<td></td>"),
                },
                _ => html.push_str(&format!(
                    "<td>{}</td>",
                    html_escape(&record.export_value(column.key))
                )),
            }
        }
        html.push_str("</tr>\n");
    }

    html.push_str("        </tbody>\n    </table>\n");
    html.push_str(&format!(
        "    <footer>Generated {}</footer>\n",
        Utc::now().to_rfc3339()
    ));
    html.push_str("</body>\n</html>\n");
    html
}

/// Write a rendered document to disk.
pub fn write_report(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html)?;
    Ok(())
}

fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnKey, TrackRecord};
    use std::path::PathBuf;

    fn session() -> GridSession {
        let mut with_cover = TrackRecord {
            track_name: "Smoke & Mirrors".to_string(),
            artist: "<The> Band".to_string(),
            year: 1999,
            ..TrackRecord::default()
        };
        with_cover.cover = Some(PathBuf::from("/music/cover.jpg"));
        GridSession::new(vec![with_cover])
    }

    #[test]
    fn test_render_escapes_cell_values() {
        let html = render(&session(), "A & B");
        assert!(html.contains("Smoke &amp; Mirrors"));
        assert!(html.contains("&lt;The&gt; Band"));
        assert!(html.contains("<h1>A &amp; B</h1>"));
        assert!(!html.contains("<The> Band"));
    }

    #[test]
    fn test_render_shows_visible_headers_only() {
        let html = render(&session(), "Library");
        assert!(html.contains("<th>Title</th>"));
        assert!(html.contains("<th>Artist</th>"));
        // ISRC is hidden by default.
        assert!(!html.contains("<th>ISRC</th>"));
    }

    #[test]
    fn test_render_honors_column_toggle() {
        let mut session = session();
        session.toggle_column(ColumnKey::Isrc);
        let html = render(&session, "Library");
        assert!(html.contains("<th>ISRC</th>"));
    }

    #[test]
    fn test_render_cover_cell_is_an_image() {
        let html = render(&session(), "Library");
        assert!(html.contains("<img src=\"/music/cover.jpg\" alt=\"Cover\">"));
    }

    #[test]
    fn test_render_includes_count_and_footer() {
        let html = render(&session(), "Library");
        assert!(html.contains("1 tracks"));
        assert!(html.contains("<footer>Generated "));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        write_report(&path, "<html></html>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a&b<c>\"d'"), "a&amp;b&lt;c&gt;&quot;d&#39;");
        assert_eq!(html_escape("plain"), "plain");
    }
}
