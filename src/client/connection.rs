use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_rustls::TlsConnector;

use crate::client::event::{ClientEvent, Generation};
use crate::error::{ConnectError, SendError};

const READ_CHUNK: usize = 4096;

/// Something framed lines can be written to.
pub trait Transport: Send {
    fn write(&mut self, frame: &[u8]) -> Result<(), SendError>;
}

trait Stream: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> Stream for T {}

/// A live link to the server.
///
/// Reads and writes run on their own tasks. Inbound bytes and the eventual
/// loss are posted to the client's event channel tagged with `generation`,
/// so events from a replaced connection can be told apart.
pub struct Connection {
    pub generation: Generation,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    reader: JoinHandle<()>,
}

impl Connection {
    pub async fn open(
        host: &str,
        port: u16,
        tls: bool,
        accept_invalid_certs: bool,
        generation: Generation,
        event_tx: mpsc::UnboundedSender<ClientEvent>,
    ) -> Result<Connection, ConnectError> {
        let addr = format!("{}:{}", host, port);
        tracing::info!(%addr, tls, "connecting");

        let tcp = TcpStream::connect(&addr).await.map_err(|source| ConnectError::Io {
            addr: addr.clone(),
            source,
        })?;
        let _ = tcp.set_nodelay(true);

        let stream: Box<dyn Stream> = if tls {
            let tls_config = if accept_invalid_certs {
                tracing::warn!(%addr, "TLS certificate verification disabled");
                insecure_tls_config()
            } else {
                default_tls_config()
            };
            let connector = TlsConnector::from(Arc::new(tls_config));
            let server_name = rustls::pki_types::ServerName::try_from(host.to_string())
                .map_err(|_| ConnectError::InvalidServerName(host.to_string()))?;
            let tls_stream = connector
                .connect(server_name, tcp)
                .await
                .map_err(|source| ConnectError::Tls {
                    addr: addr.clone(),
                    source,
                })?;
            tracing::debug!(%addr, "TLS handshake complete");
            Box::new(tls_stream)
        } else {
            Box::new(tcp)
        };

        Ok(Self::spawn(stream, generation, event_tx))
    }

    fn spawn(stream: Box<dyn Stream>, generation: Generation, event_tx: mpsc::UnboundedSender<ClientEvent>) -> Self {
        let (mut read_half, mut write_half) = tokio::io::split(stream);
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Vec<u8>>();

        let reader_tx = event_tx.clone();
        let reader = tokio::spawn(async move {
            let mut chunk = [0u8; READ_CHUNK];
            let reason = loop {
                match read_half.read(&mut chunk).await {
                    Ok(0) => break "connection closed by server".to_string(),
                    Ok(n) => {
                        let event = ClientEvent::Data {
                            generation,
                            bytes: chunk[..n].to_vec(),
                        };
                        if reader_tx.send(event).is_err() {
                            return;
                        }
                    }
                    Err(e) => break e.to_string(),
                }
            };
            let _ = reader_tx.send(ClientEvent::Lost { generation, reason });
        });

        tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                let written = match write_half.write_all(&frame).await {
                    Ok(()) => write_half.flush().await,
                    Err(e) => Err(e),
                };
                if let Err(e) = written {
                    let _ = event_tx.send(ClientEvent::Lost {
                        generation,
                        reason: format!("write failed: {}", e),
                    });
                    return;
                }
            }
            // Sender dropped: everything queued has been written.
            let _ = write_half.shutdown().await;
        });

        Self {
            generation,
            outbound,
            reader,
        }
    }
}

impl Transport for Connection {
    fn write(&mut self, frame: &[u8]) -> Result<(), SendError> {
        self.outbound
            .send(frame.to_vec())
            .map_err(|_| SendError::NotConnected)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("generation", &self.generation)
            .field("open", &!self.outbound.is_closed())
            .finish()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // The writer keeps running until its queue is flushed.
        self.reader.abort();
    }
}

fn default_tls_config() -> rustls::ClientConfig {
    let root_store = rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}

fn insecure_tls_config() -> rustls::ClientConfig {
    rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(InsecureVerifier))
        .with_no_client_auth()
}

#[derive(Debug)]
struct InsecureVerifier;

impl rustls::client::danger::ServerCertVerifier for InsecureVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::CryptoProvider::get_default()
            .map(|p| p.signature_verification_algorithms.supported_schemes())
            .unwrap_or_else(|| {
                rustls::crypto::aws_lc_rs::default_provider()
                    .signature_verification_algorithms
                    .supported_schemes()
            })
    }
}
