//! TLS certificate loading for the listener.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

/// Load TLS configuration from PEM certificate and key files.
///
/// Both files are parsed up front so a bad deployment fails at startup with
/// a pointed message instead of at the first handshake.
pub async fn load_tls_config(
    cert_path: &Path,
    key_path: &Path,
) -> Result<RustlsConfig, std::io::Error> {
    let cert_file = File::open(cert_path).map_err(|e| {
        std::io::Error::new(e.kind(), format!("certificate file {:?}: {}", cert_path, e))
    })?;
    let certs: Vec<_> = rustls_pemfile::certs(&mut BufReader::new(cert_file))
        .collect::<Result<_, _>>()?;
    if certs.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("no certificates found in {:?}", cert_path),
        ));
    }

    let key_file = File::open(key_path).map_err(|e| {
        std::io::Error::new(e.kind(), format!("private key file {:?}: {}", key_path, e))
    })?;
    let key = rustls_pemfile::private_key(&mut BufReader::new(key_file))?;
    if key.is_none() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("no private key found in {:?}", key_path),
        ));
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}
