//! Category listing pages: one page per actor / keyword / rank /
//! series / year, each linking the notes that carry that value.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use shelfmark_model::{MediaItem, NfoRecord};
use tracing::{info, warn};

use crate::error::Result;

use super::frontmatter;
use super::note::{base_code, year_of};
use super::RenderSettings;

const CATEGORY_TEMPLATE: &str = r#"---
cssclasses:
  - cards-cols-6
  - cards-cover
  - cards
---

# {title}

```dataviewjs
const META_DIR = "{meta_dir}";
const FIELD = "{filter_field}";
const VALUE = "{category_value}";

function flattenDeep(x) {
  if (Array.isArray(x)) return x.reduce((a, v) => a.concat(flattenDeep(v)), []);
  if (typeof x === "string") return [x];
  return [];
}

const pages = dv.pages(`"${META_DIR}"`)
  .where(p => flattenDeep(p[FIELD]).map(String).includes(VALUE)
           || String(p[FIELD] ?? "") === VALUE)
  .sort(p => p.Code ?? p.file.name);

dv.table(["Code", "Title", "Year", "Rank"],
  pages.map(p => [p.file.link, p.CN ?? "", p.Year ?? "", p.VideoRank ?? ""]));
```
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Actors,
    Keywords,
    Ranks,
    Series,
    Years,
}

impl Category {
    const ALL: [Category; 5] = [
        Category::Actors,
        Category::Keywords,
        Category::Ranks,
        Category::Series,
        Category::Years,
    ];

    fn filter_field(self) -> &'static str {
        match self {
            Category::Actors => "Actor",
            Category::Keywords => "Keywords",
            Category::Ranks => "VideoRank",
            Category::Series => "Series",
            Category::Years => "Year",
        }
    }

    fn dir<'a>(self, settings: &'a RenderSettings) -> &'a str {
        match self {
            Category::Actors => &settings.actors_dir,
            Category::Keywords => &settings.keywords_dir,
            Category::Ranks => &settings.ranks_dir,
            Category::Series => &settings.series_dir,
            Category::Years => &settings.years_dir,
        }
    }

    fn title(self, value: &str) -> String {
        match self {
            Category::Actors => format!("Actor: {value}"),
            Category::Keywords => format!("Keyword: {value}"),
            Category::Ranks => format!("Rank: {value}"),
            Category::Series => format!("Series: {value}"),
            Category::Years => format!("Year: {value}"),
        }
    }
}

pub struct CategoryPages {
    settings: RenderSettings,
    year: Regex,
}

impl std::fmt::Debug for CategoryPages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryPages")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CategoryPages {
    pub fn new(settings: RenderSettings) -> Result<Self> {
        Ok(Self {
            settings,
            year: Regex::new(r"(\d{4})")?,
        })
    }

    /// Emit category pages from in-memory scan results. Returns the
    /// number of pages written.
    pub fn generate(&self, entries: &[(MediaItem, NfoRecord)]) -> Result<usize> {
        let mut written = 0;
        for category in Category::ALL {
            let mut members: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for (item, record) in entries {
                let code = base_code(&item.code);
                for value in self.values_of(category, record) {
                    members.entry(value).or_default().push(code.clone());
                }
            }
            written += self.write_pages(category, members)?;
        }
        Ok(written)
    }

    /// Rebuild category pages from already-written notes, so pages
    /// reflect hand-edited frontmatter rather than the last scan.
    pub fn regenerate_from_notes(&self) -> Result<usize> {
        let mut per_category: BTreeMap<&'static str, BTreeMap<String, Vec<String>>> =
            BTreeMap::new();

        let notes_dir = &self.settings.output_directory;
        for entry in fs::read_dir(notes_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let code = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let content = match fs::read_to_string(&path) {
                Ok(c) => c,
                Err(err) => {
                    warn!("skipping unreadable note {}: {err}", path.display());
                    continue;
                }
            };
            let Some(fm) = frontmatter::frontmatter_block(&content) else {
                continue;
            };

            for category in Category::ALL {
                let values = match category {
                    Category::Actors => frontmatter::extract_list(fm, "Actor"),
                    Category::Keywords => frontmatter::extract_list(fm, "Keywords"),
                    Category::Series => frontmatter::extract_list(fm, "Series"),
                    Category::Ranks => {
                        let rank = frontmatter::extract_rank(fm);
                        if rank.is_empty() || rank == "0.0" {
                            Vec::new()
                        } else {
                            vec![rank]
                        }
                    }
                    Category::Years => {
                        let year = frontmatter::extract_scalar(fm, "Year");
                        if year.is_empty() || year == "unknown" {
                            Vec::new()
                        } else {
                            vec![year]
                        }
                    }
                };
                let bucket = per_category.entry(category.filter_field()).or_default();
                for value in values {
                    bucket.entry(value).or_default().push(code.clone());
                }
            }
        }

        let mut written = 0;
        for category in Category::ALL {
            let members = per_category
                .remove(category.filter_field())
                .unwrap_or_default();
            written += self.write_pages(category, members)?;
        }
        Ok(written)
    }

    fn values_of(&self, category: Category, record: &NfoRecord) -> Vec<String> {
        match category {
            Category::Actors => record.actors.clone(),
            Category::Keywords => record.genre.clone(),
            Category::Ranks => {
                if record.rating > 0.0 {
                    vec![format!("{:.1}", record.rating)]
                } else {
                    Vec::new()
                }
            }
            Category::Series => {
                let series = record.series.trim();
                if series.is_empty() || series == "unknown" {
                    Vec::new()
                } else {
                    vec![series.to_string()]
                }
            }
            Category::Years => {
                let year = year_of(&record.release_date, &self.year);
                if year == "unknown" {
                    Vec::new()
                } else {
                    vec![year]
                }
            }
        }
    }

    fn write_pages(
        &self,
        category: Category,
        members: BTreeMap<String, Vec<String>>,
    ) -> Result<usize> {
        if members.is_empty() {
            return Ok(0);
        }
        let dir = self.category_dir(category);
        fs::create_dir_all(&dir)?;

        let mut written = 0;
        for value in members.keys() {
            let page = CATEGORY_TEMPLATE
                .replace("{title}", &category.title(value))
                .replace("{meta_dir}", &self.meta_dir())
                .replace("{filter_field}", category.filter_field())
                .replace("{category_value}", value);
            let path = dir.join(format!("{}.md", sanitize_filename(value)));
            fs::write(&path, page)?;
            written += 1;
        }
        info!(
            "wrote {written} {} pages into {}",
            category.filter_field(),
            dir.display()
        );
        Ok(written)
    }

    /// Category pages land as siblings of the notes directory, in the
    /// last path segment of the configured vault link directory.
    fn category_dir(&self, category: Category) -> PathBuf {
        let base = self
            .settings
            .output_directory
            .parent()
            .unwrap_or_else(|| Path::new("."));
        let leaf = category
            .dir(&self.settings)
            .rsplit('/')
            .next()
            .unwrap_or("misc");
        base.join(leaf)
    }

    /// Vault-relative path of the notes directory, for dataview queries.
    fn meta_dir(&self) -> String {
        self.settings
            .output_directory
            .to_string_lossy()
            .replace('\\', "/")
    }
}

fn sanitize_filename(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
