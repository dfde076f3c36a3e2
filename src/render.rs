//! HTML markup for the channel cards and the player area.

use crate::channels::ChannelCard;
use crate::player::ErrorPanel;
use crate::view::PLACEHOLDER_TEXT;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn card_html(card: &ChannelCard) -> String {
    let title = escape_html(&card.title);
    let description = escape_html(&card.description);
    let url = urlencoding::encode(card.open.url.as_deref().unwrap_or_default()).into_owned();
    let thumb = card
        .thumbnail
        .as_deref()
        .map(|t| format!(r#"<img src="{}" class="card-img" alt="{}">"#, escape_html(t), title))
        .unwrap_or_default();

    format!(
        r#"<div class="col-12 mb-3" data-card="{index}">
  <div class="card h-100">
    <div class="row no-gutters">
      <div class="col-5">{thumb}</div>
      <div class="col-7">
        <div class="card-body p-2">
          <h6 class="card-title mb-1">{title}</h6>
          <p class="card-text small mb-2 text-truncate">{description}</p>
          <div class="d-flex">
            <button class="btn btn-sm btn-primary mr-2 btn-play" data-url="{url}">Play</button>
            <button class="btn btn-sm btn-outline-secondary btn-open" data-url="{url}">Open</button>
          </div>
        </div>
      </div>
    </div>
  </div>
</div>"#,
        index = card.key.index,
    )
}

pub fn list_html(cards: &[ChannelCard]) -> String {
    cards.iter().map(card_html).collect::<Vec<_>>().join("\n")
}

pub fn frame_html(src: &str) -> String {
    format!(
        r#"<iframe class="embed-responsive-item" src="{}" allow="autoplay; encrypted-media" allowfullscreen></iframe>"#,
        escape_html(src)
    )
}

pub fn placeholder_html() -> String {
    format!(
        r#"<div id="player-placeholder" class="d-flex align-items-center justify-content-center h-100 text-light">{}</div>"#,
        PLACEHOLDER_TEXT
    )
}

pub fn error_html(panel: &ErrorPanel) -> String {
    format!(
        r#"<div class="player-error text-light p-3">
  <p>{}</p>
  <a class="btn btn-sm btn-outline-light mr-2" href="{}" target="_blank" rel="noopener">Open externally</a>
  <button class="btn btn-sm btn-primary btn-retry">Retry</button>
</div>"#,
        escape_html(&panel.message),
        escape_html(&panel.external_url)
    )
}
