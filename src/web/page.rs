//! HTML rendering for the single-page UI
//!
//! Everything is rendered server side from the stored [`ComparisonSession`];
//! the only script on the page draws the two polylines with Leaflet.

use std::fmt::Write as _;

use serde_json::json;

use crate::core::assistant::SUGGESTED_QUESTIONS;
use crate::core::route_view::{format_signed_duration, RouteView};
use crate::core::session::ComparisonSession;

/// One-off message shown above the results
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Notice {
    #[default]
    None,
    Error(String),
    Answer { question: String, answer: String },
    Chat { query: String, reply: String },
}

const MAP_SCRIPT: &str = r#"
const routeData = __ROUTE_DATA__;
const map = L.map('map', { zoomControl: true }).setView(routeData.center, 12);
L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
  attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);
L.control.scale().addTo(map);
L.polyline(routeData.baseline, { color: 'blue', weight: 3, dashArray: '5,5' })
  .bindTooltip('Before').addTo(map);
L.polyline(routeData.optimized, { color: 'red', weight: 3 })
  .bindTooltip('Optimized').addTo(map);
routeData.optimized.forEach(function (pt, i) {
  L.marker(pt).bindPopup(routeData.labels[i]).addTo(map);
});
"#;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 300px; padding: 1rem; background: #f0f2f6; }
main { flex: 1; padding: 1rem 2rem; }
label { display: block; margin-top: .75rem; font-weight: 600; }
input[type=text], textarea { width: 100%; box-sizing: border-box; }
.metrics { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; }
.metric { background: #fafafa; border-radius: 6px; padding: .5rem 1rem; }
.metric .value { font-size: 1.6rem; }
.error { background: #fde2e1; color: #8a1c1c; padding: .75rem; border-radius: 6px; }
.info { background: #e1effe; padding: .75rem; border-radius: 6px; }
.answer { background: #e3f9e5; padding: .75rem; border-radius: 6px; }
table { border-collapse: collapse; margin-bottom: 1rem; }
td, th { border: 1px solid #ddd; padding: .25rem .75rem; text-align: left; }
#map { height: 700px; }
.questions { display: grid; grid-template-columns: 1fr 1fr; gap: .5rem; }
.questions button { width: 100%; text-align: left; }
"#;

/// Escape text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
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

/// Render the whole page
pub fn render_page(session: Option<&ComparisonSession>, notice: &Notice, qa_enabled: bool) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>🗺️ AI Route Optimizer</title>\n");
    html.push_str("<link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.css\">\n");
    html.push_str("<script src=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.js\"></script>\n");
    let _ = write!(html, "<style>{STYLE}</style>\n</head>\n<body>\n");

    render_sidebar(&mut html);

    html.push_str("<main>\n<h1>🗺️ AI-Powered Last Mile Delivery</h1>\n");
    render_notice(&mut html, notice);

    match session {
        Some(session) => {
            render_results(&mut html, session);
            render_questions(&mut html, qa_enabled);
        }
        None => {
            html.push_str("<p class=\"info\">📝 Fill in the sidebar &amp; click <b>Optimize Route 🚀</b> to begin.</p>\n");
        }
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String) {
    html.push_str(
        "<aside>\n<h2>🚩 Route Inputs</h2>\n\
         <form method=\"post\" action=\"/optimize\" enctype=\"multipart/form-data\">\n\
         <label for=\"start\">Starting Address</label>\n\
         <input type=\"text\" id=\"start\" name=\"start\">\n\
         <label for=\"end\">Destination Address</label>\n\
         <input type=\"text\" id=\"end\" name=\"end\">\n\
         <label for=\"stops_file\">Excel of Stops (.xlsx or .csv, first column)</label>\n\
         <input type=\"file\" id=\"stops_file\" name=\"stops_file\" accept=\".xlsx,.xls,.ods,.csv\">\n\
         <label for=\"stops_text\">…or one stop per line</label>\n\
         <textarea id=\"stops_text\" name=\"stops_text\" rows=\"6\"></textarea>\n\
         <p><button type=\"submit\">Optimize Route 🚀</button></p>\n\
         </form>\n</aside>\n",
    );
}

fn render_notice(html: &mut String, notice: &Notice) {
    match notice {
        Notice::None => {}
        Notice::Error(msg) => {
            let _ = writeln!(html, "<p class=\"error\">{}</p>", escape_html(msg));
        }
        Notice::Answer { question, answer } => {
            let _ = writeln!(
                html,
                "<details open class=\"answer\"><summary>✅ {}</summary><p>{}</p></details>",
                escape_html(question),
                escape_html(answer)
            );
        }
        Notice::Chat { query, reply } => {
            let _ = writeln!(
                html,
                "<div class=\"answer\"><p><b>💬 {}</b></p><p>{}</p></div>",
                escape_html(query),
                escape_html(reply)
            );
        }
    }
}

fn render_results(html: &mut String, session: &ComparisonSession) {
    let cmp = &session.comparison;

    html.push_str("<section class=\"metrics\">\n");
    metric(html, "▶️ Before Distance", &format!("{:.1} km", cmp.baseline.total_distance_km));
    metric(html, "▶️ Before Duration", &cmp.baseline.total_duration.to_string());
    metric(html, "✨ After Distance", &format!("{:.1} km", cmp.optimized.total_distance_km));
    metric(html, "✨ After Duration", &cmp.optimized.total_duration.to_string());
    html.push_str("</section>\n");
    let _ = writeln!(
        html,
        "<p>Savings: {:.1} km, {}</p>",
        cmp.distance_delta_km,
        format_signed_duration(cmp.duration_delta_secs)
    );

    html.push_str("<h2>📍 Input Route</h2>\n");
    render_table(html, &cmp.baseline);
    html.push_str("<h2>✨ Optimized Route</h2>\n");
    render_table(html, &cmp.optimized);

    html.push_str("<h2>🗺️ Map View</h2>\n<div id=\"map\"></div>\n");
    let _ = writeln!(
        html,
        "<script>{}</script>",
        MAP_SCRIPT.replace("__ROUTE_DATA__", &map_data(&cmp.baseline, &cmp.optimized))
    );
}

fn metric(html: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        html,
        "<div class=\"metric\"><div>{}</div><div class=\"value\">{}</div></div>",
        escape_html(label),
        escape_html(value)
    );
}

fn render_table(html: &mut String, view: &RouteView) {
    html.push_str("<table>\n<tr><th>Order</th><th>Address</th></tr>\n");
    for (order, address) in view.numbered_addresses() {
        let _ = writeln!(html, "<tr><td>{}</td><td>{}</td></tr>", order, escape_html(address));
    }
    html.push_str("</table>\n");
}

/// JSON literal consumed by the map script
fn map_data(baseline: &RouteView, optimized: &RouteView) -> String {
    let points = |view: &RouteView| -> Vec<[f64; 2]> {
        view.coordinates.iter().map(|c| [c.lat, c.lng]).collect()
    };
    let labels: Vec<String> = optimized
        .numbered_addresses()
        .map(|(n, address)| escape_html(&format!("{n}. {address}")))
        .collect();
    let center = baseline
        .coordinates
        .first()
        .map(|c| [c.lat, c.lng])
        .unwrap_or([0.0, 0.0]);

    json!({
        "center": center,
        "baseline": points(baseline),
        "optimized": points(optimized),
        "labels": labels,
    })
    .to_string()
    // Keep the literal from closing the surrounding <script> element
    .replace("</", "<\\/")
}

fn render_questions(html: &mut String, qa_enabled: bool) {
    html.push_str("<hr>\n<h2>💡 Suggested Questions</h2>\n");
    if !qa_enabled {
        html.push_str("<p class=\"info\">Route Q&amp;A is disabled: no language model key is configured.</p>\n");
        return;
    }

    html.push_str("<div class=\"questions\">\n");
    for question in SUGGESTED_QUESTIONS {
        let q = escape_html(question);
        let _ = writeln!(
            html,
            "<form method=\"post\" action=\"/ask\"><input type=\"hidden\" name=\"question\" value=\"{q}\"><button type=\"submit\">{q}</button></form>"
        );
    }
    html.push_str("</div>\n");

    html.push_str(
        "<h2>❓ Ask a Custom Route Question</h2>\n\
         <form method=\"post\" action=\"/ask\">\n\
         <input type=\"text\" name=\"question\" placeholder=\"Type your question here:\">\n\
         <button type=\"submit\">Get Answer 🚀</button>\n</form>\n\
         <h2>💬 Chat Playground</h2>\n\
         <form method=\"post\" action=\"/chat\">\n\
         <textarea name=\"query\" rows=\"3\" placeholder=\"Chat with LLM:\"></textarea>\n\
         <button type=\"submit\">Chat 💬</button>\n</form>\n",
    );
}
