use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six content categories a download or community link can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "pelicula-mkv-mp4")]
    PeliculaMkvMp4,
    #[serde(rename = "pelicula-iso")]
    PeliculaIso,
    #[serde(rename = "serie-mkv-mp4")]
    SerieMkvMp4,
    #[serde(rename = "serie-iso")]
    SerieIso,
    #[serde(rename = "documental-mkv-mp4")]
    DocumentalMkvMp4,
    #[serde(rename = "documental-iso")]
    DocumentalIso,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::PeliculaMkvMp4 => "pelicula-mkv-mp4",
            FileType::PeliculaIso => "pelicula-iso",
            FileType::SerieMkvMp4 => "serie-mkv-mp4",
            FileType::SerieIso => "serie-iso",
            FileType::DocumentalMkvMp4 => "documental-mkv-mp4",
            FileType::DocumentalIso => "documental-iso",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pelicula-mkv-mp4" => Ok(FileType::PeliculaMkvMp4),
            "pelicula-iso" => Ok(FileType::PeliculaIso),
            "serie-mkv-mp4" => Ok(FileType::SerieMkvMp4),
            "serie-iso" => Ok(FileType::SerieIso),
            "documental-mkv-mp4" => Ok(FileType::DocumentalMkvMp4),
            "documental-iso" => Ok(FileType::DocumentalIso),
            _ => Err(format!(
                "Invalid file type '{}'. Valid options: pelicula-mkv-mp4, pelicula-iso, \
                 serie-mkv-mp4, serie-iso, documental-mkv-mp4, documental-iso",
                s
            )),
        }
    }
}
