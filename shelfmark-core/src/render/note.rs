//! Per-item note emission: plain placeholder substitution into a fixed
//! template, no templating engine.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use regex::Regex;
use shelfmark_model::{MediaItem, NfoRecord};
use tracing::{info, warn};

use crate::error::Result;

use super::RenderSettings;

/// Note body consumed by the vault's rendering plugin. Frontmatter keys
/// (`Actor`, `Year`, `VideoRank`, `Series`, `Keywords`) are also read
/// back by the category regeneration pass, so their shapes are load
/// bearing.
const NOTE_TEMPLATE: &str = r#"---
cssclasses:
  - film-page
CN: {title_cn}
JP: {title_jp}
Code: {code}
Actor:
{actor_data}
Year: {year}
Time: {duration}
VideoRank: {rating}
Series:
{series_data}
Keywords:
{keywords_data}
Cover: {cover_path}
Fanart: {fanart_path}
---

```dataviewjs
const ROOT = "{root_dir}";
const YEAR_LINK_DIR = "{years_directory}";
const RANK_LINK_DIR = "{ranks_directory}";
const SERIES_LINK_DIR = "{series_directory}";
const ACTOR_LINK_DIR = "{actors_directory}";
const KW_DIR = "{keywords_directory}";

function chipLink(dir, value, label) {
  const span = document.createElement("span");
  span.className = "chip";
  const a = document.createElement("a");
  a.classList.add("internal-link");
  const href = dir ? `${dir}/${value}` : String(value);
  a.setAttribute("href", href);
  a.setAttribute("data-href", href);
  a.textContent = label ?? String(value);
  span.appendChild(a);
  return span;
}

function flattenDeep(x) {
  if (Array.isArray(x)) return x.reduce((a, v) => a.concat(flattenDeep(v)), []);
  if (typeof x === "string") return [x];
  return [];
}

const me = dv.current();
const el = dv.container;

const cover = me.Cover ? app.vault.getAbstractFileByPath(String(me.Cover)) : null;
if (cover) {
  const img = el.createEl("img", { cls: "film-cover" });
  img.src = app.vault.getResourcePath(cover);
} else {
  el.createEl("div", { cls: "film-cover-missing", text: "No Cover" });
}

const facts = el.createEl("div", { cls: "film-facts" });
if (me.Year) facts.appendChild(chipLink(YEAR_LINK_DIR, me.Year, `${me.Year}`));
if (me.VideoRank) facts.appendChild(chipLink(RANK_LINK_DIR, me.VideoRank, `★ ${me.VideoRank}`));
for (const s of flattenDeep(me.Series)) facts.appendChild(chipLink(SERIES_LINK_DIR, s));
for (const a of flattenDeep(me.Actor)) facts.appendChild(chipLink(ACTOR_LINK_DIR, a));
for (const k of flattenDeep(me.Keywords)) facts.appendChild(chipLink(KW_DIR, k));
```

{trailer_section}{play_button_section}## Plot

{plot_summary}

---
{additional_note}
"#;

pub struct NoteRenderer {
    settings: RenderSettings,
    year: Regex,
}

impl std::fmt::Debug for NoteRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteRenderer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Strip the variant suffix so every variant of an item shares one
/// note: `EDRG-009-F` becomes `EDRG-009`.
pub fn base_code(code: &str) -> String {
    let parts: Vec<&str> = code.split('-').collect();
    if parts.len() > 2 {
        format!("{}-{}", parts[0], parts[1])
    } else {
        code.to_string()
    }
}

/// First four-digit run in a free-form date, `unknown` otherwise.
pub fn year_of(date: &str, year: &Regex) -> String {
    year.captures(date)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn yaml_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl NoteRenderer {
    pub fn new(settings: RenderSettings) -> Result<Self> {
        Ok(Self {
            settings,
            year: Regex::new(r"(\d{4})")?,
        })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn render(&self, item: &MediaItem, record: &NfoRecord) -> String {
        let title_cn = if record.title.trim().is_empty() {
            item.code.clone()
        } else {
            record.title.clone()
        };
        let title_jp = record.original_title_or_title();
        let title_jp = if title_jp.trim().is_empty() {
            title_cn.clone()
        } else {
            title_jp.to_string()
        };

        let year = year_of(&record.release_date, &self.year);
        let rating = format!("{:.1}", record.rating);

        let cover_path = item
            .poster
            .as_deref()
            .map(|p| self.vault_path(p))
            .unwrap_or_default();
        let fanart_path = item
            .fanart
            .as_deref()
            .map(|p| self.vault_path(p))
            .unwrap_or_default();

        NOTE_TEMPLATE
            .replace("{title_cn}", &title_cn)
            .replace("{title_jp}", &title_jp)
            .replace("{code}", &item.code)
            .replace("{actor_data}", &format_actors(&record.actors))
            .replace("{year}", &year)
            .replace("{duration}", &record.runtime)
            .replace("{rating}", &rating)
            .replace("{series_data}", &format_series(&record.series))
            .replace(
                "{keywords_data}",
                &format_keywords(
                    &record.genre,
                    &self.settings.exclude_keywords,
                    self.settings.max_keywords,
                ),
            )
            .replace("{cover_path}", &cover_path)
            .replace("{fanart_path}", &fanart_path)
            .replace("{root_dir}", &self.settings.root_dir)
            .replace("{years_directory}", &self.settings.years_dir)
            .replace("{ranks_directory}", &self.settings.ranks_dir)
            .replace("{series_directory}", &self.settings.series_dir)
            .replace("{actors_directory}", &self.settings.actors_dir)
            .replace("{keywords_directory}", &self.settings.keywords_dir)
            .replace("{trailer_section}", &self.trailer_section(item))
            .replace("{play_button_section}", &self.play_button_section(item))
            .replace("{plot_summary}", &record.plot)
            .replace(
                "{additional_note}",
                &format!(
                    "Generated: {}",
                    Local::now().format(&self.settings.datetime_format)
                ),
            )
    }

    /// Write the rendered note as `<base-code>.md` under the output
    /// directory, creating the directory if needed.
    pub fn save(&self, item: &MediaItem, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.settings.output_directory)?;
        let path = self
            .settings
            .output_directory
            .join(format!("{}.md", base_code(&item.code)));
        fs::write(&path, content)?;
        info!("wrote note {}", path.display());
        Ok(path)
    }

    /// Turn a media file path into a vault-relative forward-slash path,
    /// anchored under the configured root directory.
    pub fn vault_path(&self, path: &Path) -> String {
        let raw = path.to_string_lossy().replace('\\', "/");
        let prefix = self.settings.absolute_path_prefix.replace('\\', "/");
        let trimmed = if !prefix.is_empty() && raw.starts_with(&prefix) {
            raw[prefix.len()..].trim_start_matches('/').to_string()
        } else {
            raw
        };

        let anchor = self
            .settings
            .root_dir
            .split('/')
            .next()
            .unwrap_or_default();
        if anchor.is_empty() || trimmed.starts_with(anchor) {
            return trimmed;
        }
        if let Some(idx) = trimmed.find(anchor) {
            return trimmed[idx..].to_string();
        }
        format!(
            "{}/{}",
            self.settings.root_dir,
            trimmed.trim_start_matches('/')
        )
    }

    fn trailer_section(&self, item: &MediaItem) -> String {
        let Some(trailer) = item.trailer.as_deref() else {
            return String::new();
        };
        let size = match fs::metadata(trailer) {
            Ok(meta) => meta.len(),
            Err(err) => {
                warn!("trailer unreadable {}: {err}", trailer.display());
                return String::new();
            }
        };
        if size < self.settings.min_trailer_bytes {
            info!(
                "skipping undersized trailer {} ({size} bytes)",
                trailer.display()
            );
            return String::new();
        }
        let filename = trailer
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("## Trailer\n\n![[{filename}]]\n\n")
    }

    fn play_button_section(&self, item: &MediaItem) -> String {
        let Some(video) = item.video.as_deref() else {
            return String::new();
        };
        let body = if item.is_stream() {
            match fs::read_to_string(video) {
                Ok(url) => stream_play_button(url.trim(), &item.code),
                Err(err) => {
                    warn!("cannot read stream pointer {}: {err}", video.display());
                    return String::new();
                }
            }
        } else {
            local_play_button(video)
        };
        format!("## Feature\n\n{body}\n\n")
    }
}

fn format_actors(actors: &[String]) -> String {
    if actors.is_empty() {
        return "  - []".to_string();
    }
    actors
        .iter()
        .map(|a| format!("  - - - {}", yaml_escape(a)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_keywords(genres: &[String], exclude: &[String], max: usize) -> String {
    let kept: Vec<&String> = genres
        .iter()
        .filter(|g| !exclude.iter().any(|x| g.contains(x.as_str())))
        .take(max)
        .collect();
    if kept.is_empty() {
        return "[]".to_string();
    }
    kept.iter()
        .map(|g| format!("  - - - {}", yaml_escape(g)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_series(series: &str) -> String {
    let series = series.trim();
    if series.is_empty() {
        "  - []".to_string()
    } else {
        format!("  - - {}", yaml_escape(series))
    }
}

fn stream_play_button(url: &str, code: &str) -> String {
    format!(
        "```meta-bind-button\n\
         label: PLAY\n\
         style: primary\n\
         icon: play\n\
         class: btn-001\n\
         action:\n\
         \x20 type: inlineJS\n\
         \x20 code: |\n\
         \x20   // stream pointer for {code}\n\
         \x20   const url = \"{url}\";\n\
         \x20   require('electron').shell.openPath(url);\n\
         ```"
    )
}

fn local_play_button(video: &Path) -> String {
    let path = video.to_string_lossy().replace('\\', "/");
    format!(
        "```meta-bind-button\n\
         label: PLAY\n\
         style: primary\n\
         icon: play\n\
         class: btn-001\n\
         action:\n\
         \x20 type: inlineJS\n\
         \x20 code: |\n\
         \x20   const p = \"{path}\";\n\
         \x20   require('electron').shell.openPath(p);\n\
         ```"
    )
}
