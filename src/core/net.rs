// src/core/net.rs

// Blocking HTTP GET. The pipeline is synchronous; the only blocking call is here.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};

pub fn client(accept_invalid_certs: bool) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()?;
    Ok(client)
}

pub fn http_get(client: &Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
        .header(ACCEPT_LANGUAGE, "fr-FR,fr;q=0.9,en;q=0.8")
        .send()?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Http { url: s!(url), status: status.as_u16() });
    }
    Ok(resp.text()?)
}
