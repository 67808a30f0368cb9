use serde::Serialize;
use time::macros::format_description;
use time::Date;

pub type ItemId = u32;

/// Tag assigned to items whose genre field is empty.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// One cleaned catalog row.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Raw genre field as listed in the source, e.g. "Dramas, Thrillers".
    pub listed_in: String,
    pub genre_tags: Vec<String>,
    pub description: String,
    pub director: String,
    pub cast: String,
    pub duration_minutes: u32,
    pub is_tv_show: bool,
    pub date_added: Date,
    pub kind: String,
    pub country: String,
    pub rating: String,
    pub release_year: Option<u16>,
    pub clean: CleanText,
}

/// Lower-cased text variants fed to the vectorizers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanText {
    pub genre: String,
    pub description: String,
    pub director: String,
    pub cast: String,
}

impl Item {
    pub fn field_text(&self, field: Field) -> &str {
        match field {
            Field::Genre => &self.clean.genre,
            Field::Description => &self.clean.description,
            Field::Director => &self.clean.director,
            Field::Cast => &self.clean.cast,
        }
    }

    pub fn date_added_iso(&self) -> String {
        self.date_added
            .format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_default()
    }

    /// True when the item carries no genre beyond the placeholder tag.
    pub fn has_genre_data(&self) -> bool {
        self.genre_tags.iter().any(|g| !g.is_empty() && g != UNKNOWN_GENRE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Genre,
    Description,
    Director,
    Cast,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Genre, Field::Description, Field::Director, Field::Cast];

    pub fn index(self) -> usize {
        match self {
            Field::Genre => 0,
            Field::Description => 1,
            Field::Director => 2,
            Field::Cast => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Genre => "genre",
            Field::Description => "description",
            Field::Director => "director",
            Field::Cast => "cast",
        }
    }
}
