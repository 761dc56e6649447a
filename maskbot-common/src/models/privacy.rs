// File: maskbot-common/src/models/privacy.rs

/// System/member privacy. Stored as lowercase text; anything unrecognized
/// reads as public so a bad row never breaks loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Privacy {
    #[default]
    Public,
    Private,
}

impl Privacy {
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("private") => Privacy::Private,
            _ => Privacy::Public,
        }
    }
}
