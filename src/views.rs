// Server-rendered HTML for the three pages

use crate::models::{ClientType, Marque, RepairRecord};
use crate::stats::FinancialSummary;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::fmt::Write;

/// Bytes that must be escaped inside one URL path segment, plus the HTML
/// attribute metacharacters, so evidence filenames with spaces, `#` or `?`
/// still produce working links.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Static advisory shown on the dashboard. No forecasting runs behind it.
const INSIGHT: &str = "💡 Insight Expert : Les données montrent que les écrans Samsung \
représentent 30% de votre CA. Pensez à stocker ces pièces à l'avance.";

const STYLE: &str = r#"
body { margin: 0; font-family: sans-serif; display: flex; min-height: 100vh; }
nav { background: #1c2434; color: #fff; width: 220px; padding: 1.5rem 1rem; }
nav h1 { font-size: 1.2rem; }
nav a { display: block; color: #cfd6e4; text-decoration: none; padding: .5rem .6rem; border-radius: 4px; margin-bottom: .25rem; }
nav a.active, nav a:hover { background: #33415c; color: #fff; }
main { flex: 1; padding: 2rem; background: #f5f6fa; }
form fieldset { border: 1px solid #d4d8e2; border-radius: 6px; margin-bottom: 1rem; padding: 1rem; background: #fff; }
label { display: block; margin: .5rem 0 .2rem; font-weight: 600; }
input, select, textarea { width: 100%; max-width: 28rem; padding: .4rem; box-sizing: border-box; }
button { margin-top: 1rem; padding: .6rem 1.4rem; background: #2563eb; color: #fff; border: 0; border-radius: 4px; cursor: pointer; }
table { border-collapse: collapse; width: 100%; background: #fff; }
th, td { border: 1px solid #d4d8e2; padding: .4rem .6rem; text-align: left; font-size: .9rem; }
th { background: #e8ebf3; }
.banner { background: #d1fadf; border: 1px solid #12b76a; padding: .6rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.warning { background: #fef0c7; border: 1px solid #f79009; padding: .6rem 1rem; border-radius: 4px; }
.metrics { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
.metric { background: #fff; border: 1px solid #d4d8e2; border-radius: 6px; padding: 1rem 1.5rem; flex: 1; }
.metric .value { font-size: 1.5rem; font-weight: 700; }
.charts { display: flex; gap: 2rem; flex-wrap: wrap; }
.chart { flex: 1; min-width: 260px; background: #fff; border: 1px solid #d4d8e2; border-radius: 6px; padding: 1rem; }
.bar-row { display: flex; align-items: center; gap: .5rem; margin: .3rem 0; }
.bar-row .bar { background: #2563eb; height: 1.1rem; border-radius: 2px; }
.bar-row .label { width: 7.5rem; font-size: .85rem; }
.insight { background: #e0ecff; border: 1px solid #2563eb; padding: .8rem 1rem; border-radius: 4px; margin-top: 1.5rem; }
.filters label { display: inline-block; font-weight: 400; margin-right: 1rem; }
.filters input { width: auto; }
"#;

/// Minimal HTML escaping for text interpolated into markup.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// FCFA amounts with thousands separators, like the original dashboard.
pub fn format_fcfa(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn page(title: &str, active: &str, body: &str) -> String {
    let nav_items = [
        ("/nouvelle", "Nouvelle Intervention"),
        ("/journal", "Journal & Suivi"),
        ("/dashboard", "Dashboard Financier"),
    ];
    let mut nav = String::new();
    for (href, label) in nav_items {
        let class = if href == active { " class=\"active\"" } else { "" };
        let _ = write!(nav, "<a href=\"{href}\"{class}>{label}</a>");
    }
    format!(
        "<!doctype html><html lang=\"fr\"><head><meta charset=\"utf-8\">\
         <title>{title} — Deen LAB</title><style>{STYLE}</style></head><body>\
         <nav><h1>Deen LAB 🔧</h1>{nav}</nav><main><h2>{title}</h2>{body}</main></body></html>"
    )
}

/// Intake form. `saved` shows the success banner after a redirect.
pub fn nouvelle_page(saved: bool) -> String {
    let mut body = String::new();
    if saved {
        body.push_str("<div class=\"banner\">Intervention enregistrée avec succès !</div>");
    }

    body.push_str("<form method=\"post\" action=\"/nouvelle\" enctype=\"multipart/form-data\">");

    body.push_str("<fieldset><legend>Infos Client</legend>");
    body.push_str("<label for=\"client_nom\">Nom du Client</label><input id=\"client_nom\" name=\"client_nom\">");
    // Collected like the original form, but not part of the stored row.
    body.push_str("<label for=\"client_numero\">Numéro de téléphone</label><input id=\"client_numero\" name=\"client_numero\">");
    body.push_str("<label for=\"client_type\">Type de Client</label><select id=\"client_type\" name=\"client_type\">");
    for ct in ClientType::ALL {
        let _ = write!(body, "<option>{}</option>", ct.label());
    }
    body.push_str("</select></fieldset>");

    body.push_str("<fieldset><legend>Infos Appareil</legend>");
    body.push_str("<label for=\"marque\">Marque</label><select id=\"marque\" name=\"marque\">");
    for marque in Marque::ALL {
        let _ = write!(body, "<option>{}</option>", marque.label());
    }
    body.push_str("</select>");
    body.push_str("<label for=\"modele\">Modèle (ex: iPhone 12)</label><input id=\"modele\" name=\"modele\">");
    body.push_str("</fieldset>");

    body.push_str("<fieldset><legend>Technique &amp; Finance</legend>");
    body.push_str("<label for=\"probleme\">Problème décrit par le client</label><textarea id=\"probleme\" name=\"probleme\" rows=\"3\"></textarea>");
    body.push_str("<label for=\"diagnostic\">Diagnostic Technique</label><textarea id=\"diagnostic\" name=\"diagnostic\" rows=\"3\"></textarea>");
    body.push_str("<label for=\"prix_devis\">Montant Annoncé (FCFA)</label><input id=\"prix_devis\" name=\"prix_devis\" type=\"number\" min=\"0\" step=\"500\" value=\"0\">");
    body.push_str("<label for=\"prix_final\">Montant Final Convenu (FCFA)</label><input id=\"prix_final\" name=\"prix_final\" type=\"number\" min=\"0\" step=\"500\" value=\"0\">");
    body.push_str("<label for=\"photo\">Preuve Photo/Vidéo</label><input id=\"photo\" name=\"photo\" type=\"file\" accept=\".png,.jpg,.jpeg\">");
    body.push_str("</fieldset>");

    body.push_str("<button type=\"submit\">Enregistrer l'intervention</button></form>");

    page("📝 Nouvelle Réparation", "/nouvelle", &body)
}

/// Journal table with the marque filter checkboxes. `available` is the set of
/// distinct marques on file; `selection` is what the user ticked; `rows` the
/// rows that survived filtering.
pub fn journal_page(available: &[Marque], selection: &[Marque], rows: &[&RepairRecord]) -> String {
    let mut body = String::new();

    if !available.is_empty() {
        body.push_str("<form method=\"get\" action=\"/journal\" class=\"filters\"><strong>Filtrer par marque :</strong> ");
        for marque in available {
            let checked = if selection.contains(marque) { " checked" } else { "" };
            let _ = write!(
                body,
                "<label><input type=\"checkbox\" name=\"marque\" value=\"{0}\"{1}> {0}</label>",
                escape(marque.label()),
                checked
            );
        }
        body.push_str("<button type=\"submit\">Appliquer</button></form>");
    }

    body.push_str("<table><thead><tr>");
    for col in [
        "Date", "ID", "Client", "Type", "Marque", "Modèle", "Problème", "Diagnostic",
        "Devis (FCFA)", "Final (FCFA)", "Statut", "Preuve",
    ] {
        let _ = write!(body, "<th>{col}</th>");
    }
    body.push_str("</tr></thead><tbody>");

    for r in rows {
        body.push_str("<tr>");
        let _ = write!(body, "<td>{}</td>", escape(&r.date));
        let _ = write!(body, "<td>{}</td>", escape(&r.id_unique));
        let _ = write!(body, "<td>{}</td>", escape(&r.client_nom));
        let _ = write!(body, "<td>{}</td>", r.client_type);
        let _ = write!(body, "<td>{}</td>", r.appareil_marque);
        let _ = write!(body, "<td>{}</td>", escape(&r.appareil_modele));
        let _ = write!(body, "<td>{}</td>", escape(&r.probleme));
        let _ = write!(body, "<td>{}</td>", escape(&r.diagnostic));
        let _ = write!(body, "<td>{}</td>", format_fcfa(u64::from(r.prix_devis)));
        let _ = write!(body, "<td>{}</td>", format_fcfa(u64::from(r.prix_final)));
        let _ = write!(body, "<td>{}</td>", escape(&r.statut));
        if r.has_evidence() {
            // Only the final path component is addressable under /evidence.
            let name = r.image_path.rsplit(['/', '\\']).next().unwrap_or(&r.image_path);
            let _ = write!(
                body,
                "<td><a href=\"/evidence/{}\">{}</a></td>",
                utf8_percent_encode(name, PATH_SEGMENT),
                escape(name)
            );
        } else {
            let _ = write!(body, "<td>{}</td>", escape(&r.image_path));
        }
        body.push_str("</tr>");
    }
    body.push_str("</tbody></table>");

    page("📂 Journal des réparations", "/journal", &body)
}

fn bar_chart(title: &str, counts: &[(String, usize)]) -> String {
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(1);
    let mut chart = format!("<div class=\"chart\"><h3>{}</h3>", escape(title));
    for (label, n) in counts {
        let width = 100 * n / max;
        let _ = write!(
            chart,
            "<div class=\"bar-row\"><span class=\"label\">{}</span>\
             <div class=\"bar\" style=\"width:{}%\"></div><span>{}</span></div>",
            escape(label),
            width,
            n
        );
    }
    chart.push_str("</div>");
    chart
}

/// Dashboard: three metrics, two bar charts, one static insight. `None`
/// summary means the table is empty and only the warning is rendered.
pub fn dashboard_page(
    summary: Option<&FinancialSummary>,
    marque_counts: &[(String, usize)],
    client_counts: &[(String, usize)],
) -> String {
    let body = match summary {
        None => "<div class=\"warning\">Pas assez de données pour afficher le dashboard.</div>".to_string(),
        Some(s) => {
            let mut body = String::from("<div class=\"metrics\">");
            for (label, value) in [
                ("Chiffre d'Affaires Total", format!("{} FCFA", format_fcfa(s.total))),
                ("Total Interventions", s.count.to_string()),
                ("Panier Moyen", format!("{} FCFA", format_fcfa(s.mean.round() as u64))),
            ] {
                let _ = write!(
                    body,
                    "<div class=\"metric\"><div>{label}</div><div class=\"value\">{value}</div></div>"
                );
            }
            body.push_str("</div><div class=\"charts\">");
            body.push_str(&bar_chart("Réparations par Marque", marque_counts));
            body.push_str(&bar_chart("Types de Clients", client_counts));
            body.push_str("</div>");
            let _ = write!(body, "<div class=\"insight\">{INSIGHT}</div>");
            body
        }
    };
    page("📊 Prévisions et Statistiques", "/dashboard", &body)
}
