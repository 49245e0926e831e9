use chordsweep_core::{Coord2, GameParams};
use url::Url;

use crate::*;

/// URL layout of the game API rooted at `api`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    api: Url,
}

impl Endpoints {
    pub fn new(api: Url) -> Result<Self> {
        if api.cannot_be_a_base() {
            return Err(ProtocolError::InvalidBaseUrl(api.into()));
        }
        Ok(Self { api })
    }

    pub fn parse(api: &str) -> Result<Self> {
        let api = Url::parse(api).map_err(|_| ProtocolError::InvalidBaseUrl(api.to_string()))?;
        Self::new(api)
    }

    pub fn api(&self) -> &Url {
        &self.api
    }

    fn at(&self, segments: &[&str]) -> Url {
        let mut url = self.api.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn with_cell(mut url: Url, (x, y): Coord2) -> Url {
        url.query_pairs_mut()
            .append_pair("x", &x.to_string())
            .append_pair("y", &y.to_string());
        url
    }

    pub fn status(&self) -> Url {
        self.at(&["status"])
    }

    pub fn login(&self) -> Url {
        self.at(&["login"])
    }

    pub fn logout(&self) -> Url {
        self.at(&["logout"])
    }

    pub fn register(&self) -> Url {
        self.at(&["register"])
    }

    pub fn records(&self, username: Option<&str>, board_key: Option<&str>) -> Url {
        let mut url = self.at(&["records"]);
        if username.is_some() || board_key.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(username) = username {
                query.append_pair("username", username);
            }
            if let Some(board_key) = board_key {
                query.append_pair("seed", board_key);
            }
        }
        url
    }

    pub fn my_records(&self) -> Url {
        self.at(&["myrecords"])
    }

    /// `POST` target that creates a session and opens `origin` in one go.
    pub fn new_game(&self, origin: Coord2, params: &GameParams) -> Url {
        let mut url = Self::with_cell(self.at(&["game"]), origin);
        url.query_pairs_mut()
            .append_pair("width", &params.width.to_string())
            .append_pair("height", &params.height.to_string())
            .append_pair("mine_count", &params.mine_count.to_string())
            .append_pair("unique", if params.unique { "true" } else { "false" });
        url
    }

    pub fn game(&self, session_id: &str) -> Url {
        self.at(&["game", session_id])
    }

    pub fn open(&self, session_id: &str, coords: Coord2) -> Url {
        Self::with_cell(self.at(&["game", session_id, "open"]), coords)
    }

    pub fn flag(&self, session_id: &str, coords: Coord2) -> Url {
        Self::with_cell(self.at(&["game", session_id, "flag"]), coords)
    }

    pub fn chord(&self, session_id: &str, coords: Coord2) -> Url {
        Self::with_cell(self.at(&["game", session_id, "chord"]), coords)
    }

    /// Session socket carrying [`Command`]s up and [`GameUpdate`]s down.
    pub fn socket(&self, session_id: &str) -> Result<Url> {
        let mut url = self.at(&["game", session_id, "ws"]);
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|()| ProtocolError::InvalidBaseUrl(self.api.to_string()))?;
        Ok(url)
    }
}
