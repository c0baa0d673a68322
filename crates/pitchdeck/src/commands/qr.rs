use crate::config::Config;
use crate::qr::{self, QrSize};

pub fn run(url: Option<String>, size: Option<QrSize>) -> anyhow::Result<()> {
    let config = Config::load_or_default().qr();
    let data = url.as_deref().unwrap_or(config.url());
    let size = size.unwrap_or(config.size());
    println!("{}", qr::qr_image_url(data, size));
    Ok(())
}
