//! Server-rendered HTML pages.
//!
//! Presentation only: each function receives exactly the data its route
//! fetched and returns a full page. Dynamic text always passes through
//! [`escape`] before landing in markup.

use axum::response::Html;

use crate::db::models::{Category, Design, DesignWithCategory};
use crate::middleware::flash::FlashMessage;

/// Minimal HTML/attribute escaping for untrusted text.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, flash: &[FlashMessage], body: &str) -> Html<String> {
    let mut flash_html = String::new();
    if !flash.is_empty() {
        flash_html.push_str("<ul class=\"flash\">");
        for msg in flash {
            flash_html.push_str(&format!(
                "<li class=\"flash-{}\">{}</li>",
                msg.level.as_str(),
                escape(&msg.message)
            ));
        }
        flash_html.push_str("</ul>");
    }
    Html(format!(
        "<!doctype html>\n\
         <html><head><meta charset=\"utf-8\"><title>{} - Atelier</title></head>\n\
         <body>\n\
         <header><nav>\
         <a href=\"/\">Home</a> <a href=\"/gallery\">Gallery</a> \
         <a href=\"/about\">About</a> <a href=\"/contact\">Contact</a> \
         <a href=\"/admin\">Admin</a>\
         </nav></header>\n\
         {}\n\
         <main>{}</main>\n\
         </body></html>",
        escape(title),
        flash_html,
        body
    ))
}

fn design_card(d: &Design) -> String {
    format!(
        "<figure class=\"design\"><img src=\"{}\" alt=\"{}\">\
         <figcaption><a href=\"/design/{}\">{}</a></figcaption></figure>",
        escape(&d.image_url),
        escape(&d.title),
        d.id,
        escape(&d.title)
    )
}

fn joined_card(d: &DesignWithCategory) -> String {
    let category = d
        .category_name
        .as_deref()
        .map(|name| format!(" <small>({})</small>", escape(name)))
        .unwrap_or_default();
    format!(
        "<figure class=\"design\"><img src=\"{}\" alt=\"{}\">\
         <figcaption><a href=\"/design/{}\">{}</a>{}</figcaption></figure>",
        escape(&d.image_url),
        escape(&d.title),
        d.id,
        escape(&d.title),
        category
    )
}

fn category_options(categories: &[Category], selected: Option<i64>) -> String {
    let mut out = String::from("<option value=\"\">All categories</option>");
    for cat in categories {
        let flag = if selected == Some(cat.id) { " selected" } else { "" };
        out.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            cat.id,
            flag,
            escape(&cat.name)
        ));
    }
    out
}

pub fn home_page(flash: &[FlashMessage], featured: &[Design], newest: &[Design]) -> Html<String> {
    let featured_html: String = featured.iter().map(|d| design_card(d)).collect();
    let newest_html: String = newest.iter().map(|d| design_card(d)).collect();
    let body = format!(
        "<h1>Atelier</h1>\
         <section><h2>Featured</h2><div class=\"grid\">{featured_html}</div></section>\
         <section><h2>Newest</h2><div class=\"grid\">{newest_html}</div></section>"
    );
    layout("Home", flash, &body)
}

pub fn gallery_page(
    flash: &[FlashMessage],
    designs: &[DesignWithCategory],
    categories: &[Category],
    q: &str,
    selected_cat: Option<i64>,
    view: &str,
) -> Html<String> {
    let filter = format!(
        "<form method=\"get\" action=\"/gallery\">\
         <input type=\"search\" name=\"q\" value=\"{}\" placeholder=\"Search designs\">\
         <select name=\"cat\">{}</select>\
         <input type=\"hidden\" name=\"view\" value=\"{}\">\
         <button type=\"submit\">Filter</button></form>",
        escape(q),
        category_options(categories, selected_cat),
        escape(view)
    );
    let results = if view == "list" {
        let items: String = designs
            .iter()
            .map(|d| format!("<li>{}</li>", joined_card(d)))
            .collect();
        format!("<ul class=\"list\">{items}</ul>")
    } else {
        let cards: String = designs.iter().map(|d| joined_card(d)).collect();
        format!("<div class=\"grid\">{cards}</div>")
    };
    let body = format!("<h1>Gallery</h1>{filter}{results}");
    layout("Gallery", flash, &body)
}

pub fn design_detail_page(flash: &[FlashMessage], d: &DesignWithCategory) -> Html<String> {
    let category = d
        .category_name
        .as_deref()
        .map(escape)
        .unwrap_or_else(|| "Uncategorized".to_string());
    let body = format!(
        "<article><h1>{}</h1><img src=\"{}\" alt=\"{}\">\
         <p>Category: {}</p><p>Added: {}</p></article>",
        escape(&d.title),
        escape(&d.image_url),
        escape(&d.title),
        category,
        d.created_at.format("%Y-%m-%d")
    );
    layout(&d.title, flash, &body)
}

pub fn about_page(flash: &[FlashMessage], total_designs: i64, total_categories: i64) -> Html<String> {
    let body = format!(
        "<h1>About</h1>\
         <p>This gallery currently holds {total_designs} designs across {total_categories} categories.</p>"
    );
    layout("About", flash, &body)
}

pub fn contact_page(flash: &[FlashMessage]) -> Html<String> {
    let body = "<h1>Contact</h1><p>Write to <a href=\"mailto:studio@atelier.example\">studio@atelier.example</a>.</p>";
    layout("Contact", flash, body)
}

pub fn login_page(flash: &[FlashMessage], next: &str) -> Html<String> {
    let body = format!(
        "<h1>Admin login</h1>\
         <form method=\"post\" action=\"/admin/login\">\
         <input type=\"hidden\" name=\"next\" value=\"{}\">\
         <label>Username <input name=\"username\" required></label>\
         <label>Password <input type=\"password\" name=\"password\" required></label>\
         <button type=\"submit\">Log in</button></form>",
        escape(next)
    );
    layout("Login", flash, &body)
}

pub fn dashboard_page(
    flash: &[FlashMessage],
    total_designs: i64,
    total_categories: i64,
    total_featured: i64,
    categories: &[Category],
) -> Html<String> {
    let cats: String = categories
        .iter()
        .map(|c| format!("<li>{}</li>", escape(&c.name)))
        .collect();
    let body = format!(
        "<h1>Dashboard</h1>\
         <ul class=\"stats\">\
         <li>{total_designs} designs</li>\
         <li>{total_categories} categories</li>\
         <li>{total_featured} featured</li>\
         </ul>\
         <p><a href=\"/admin/designs\">Manage designs</a> \
         <a href=\"/admin/categories\">Manage categories</a> \
         <a href=\"/admin/logout\">Log out</a></p>\
         <h2>Categories</h2><ul>{cats}</ul>"
    );
    layout("Dashboard", flash, &body)
}

pub fn categories_page(flash: &[FlashMessage], categories: &[Category]) -> Html<String> {
    let rows: String = categories
        .iter()
        .map(|c| {
            format!(
                "<tr><td>{}</td>\
                 <td><form method=\"post\" action=\"/admin/categories/edit/{}\">\
                 <input name=\"name\" value=\"{}\"><button type=\"submit\">Rename</button></form></td>\
                 <td><form method=\"post\" action=\"/admin/categories/delete/{}\">\
                 <button type=\"submit\">Delete</button></form></td></tr>",
                c.id,
                c.id,
                escape(&c.name),
                c.id
            )
        })
        .collect();
    let body = format!(
        "<h1>Categories</h1>\
         <form method=\"post\" action=\"/admin/categories\">\
         <input name=\"name\" placeholder=\"New category\">\
         <button type=\"submit\">Add</button></form>\
         <table><tr><th>Id</th><th>Name</th><th></th></tr>{rows}</table>"
    );
    layout("Categories", flash, &body)
}

pub fn designs_page(
    flash: &[FlashMessage],
    designs: &[DesignWithCategory],
    categories: &[Category],
) -> Html<String> {
    let add_form = format!(
        "<form method=\"post\" action=\"/admin/designs/add\">\
         <input name=\"title\" placeholder=\"Title\">\
         <input name=\"image_url\" placeholder=\"Image URL\">\
         <select name=\"category\">{}</select>\
         <label><input type=\"checkbox\" name=\"featured\">Featured</label>\
         <button type=\"submit\">Add design</button></form>",
        category_options(categories, None)
    );
    let rows: String = designs
        .iter()
        .map(|d| {
            let featured_box = if d.featured { " checked" } else { "" };
            format!(
                "<tr><td>{}</td>\
                 <td><form method=\"post\" action=\"/admin/designs/edit/{}\">\
                 <input name=\"title\" value=\"{}\">\
                 <input name=\"image_url\" value=\"{}\">\
                 <select name=\"category\">{}</select>\
                 <label><input type=\"checkbox\" name=\"featured\"{}>Featured</label>\
                 <button type=\"submit\">Save</button></form></td>\
                 <td><form method=\"post\" action=\"/admin/designs/toggle_featured/{}\">\
                 <button type=\"submit\">Toggle featured</button></form></td>\
                 <td><form method=\"post\" action=\"/admin/designs/delete/{}\">\
                 <button type=\"submit\">Delete</button></form></td></tr>",
                d.id,
                d.id,
                escape(&d.title),
                escape(&d.image_url),
                category_options(categories, d.category_id),
                featured_box,
                d.id,
                d.id
            )
        })
        .collect();
    let body = format!(
        "<h1>Designs</h1>{add_form}\
         <table><tr><th>Id</th><th>Design</th><th></th><th></th></tr>{rows}</table>"
    );
    layout("Designs", flash, &body)
}
