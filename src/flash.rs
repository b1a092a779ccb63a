use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

const COOKIE_NAME: &str = "flash";

/// One-shot success notices shown on the next admin page render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flash {
    Deleted,
    Updated,
}

impl Flash {
    pub fn message(self) -> &'static str {
        match self {
            Flash::Deleted => "Видео удалено успешно!",
            Flash::Updated => "Видео обновлено успешно!",
        }
    }

    pub fn category(self) -> &'static str {
        "success"
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "deleted" => Some(Flash::Deleted),
            "updated" => Some(Flash::Updated),
            _ => None,
        }
    }

    pub fn set_cookie(self) -> HeaderValue {
        HeaderValue::from_static(match self {
            Flash::Deleted => "flash=deleted; Path=/; HttpOnly; SameSite=Lax",
            Flash::Updated => "flash=updated; Path=/; HttpOnly; SameSite=Lax",
        })
    }

    /// Pending flash carried by the request cookies, if any.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == COOKIE_NAME)
            .and_then(|(_, value)| Flash::from_key(value))
    }

    /// Header that drops the cookie once the message has been shown.
    pub fn clear_cookie() -> (axum::http::HeaderName, HeaderValue) {
        (SET_COOKIE, HeaderValue::from_static("flash=; Path=/; Max-Age=0"))
    }
}
