//! HTML pages for the game lists.

use shelfmates_core::config::PlayerSlot;

/// Page listing the games all three players own.
pub fn common_games_page(games: &[String], updated: &str) -> String {
    page("Games in common", games, updated)
}

/// Page listing one player's library.
pub fn player_games_page(player: PlayerSlot, games: &[String], updated: &str) -> String {
    page(&format!("{}'s games", player.label()), games, updated)
}

fn page(heading: &str, games: &[String], updated: &str) -> String {
    let heading = escape_html(heading);

    let mut nav = String::from(r#"<a href="/">Common</a>"#);
    for slot in PlayerSlot::ALL {
        nav.push_str(&format!(
            r#" | <a href="/{}_games">{}</a>"#,
            slot.slug(),
            slot.label()
        ));
    }

    let body = if games.is_empty() {
        "<p>No games found.</p>".to_string()
    } else {
        let items: String = games
            .iter()
            .map(|name| format!("    <li>{}</li>\n", escape_html(name)))
            .collect();
        format!("<ul>\n{}</ul>", items)
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{heading}</title>\n\
         </head>\n\
         <body>\n\
         <nav>{nav}</nav>\n\
         <h1>{heading}</h1>\n\
         <p>{count} games, updated {updated}</p>\n\
         {body}\n\
         </body>\n\
         </html>\n",
        heading = heading,
        nav = nav,
        count = games.len(),
        updated = escape_html(updated),
        body = body,
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
