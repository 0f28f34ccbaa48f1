use hickory_resolver::proto::{
    op::{Message, MessageType, OpCode, ResponseCode},
    rr::{
        rdata::{A, SRV},
        Name, RData, Record,
    },
    serialize::binary::{BinDecodable, BinEncodable},
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};

const TTL: u32 = 60;

/// The records a [`FakeDns`] answers with.
#[derive(Clone, Default)]
pub struct Zone {
    records: Vec<Record>,
}

impl Zone {
    /// Register an SRV record for `name`, e.g. `_geocolo._tcp.geo.internal.`.
    pub fn with_srv(
        mut self,
        name: &str,
        priority: u16,
        weight: u16,
        port: u16,
        target: &str,
    ) -> Self {
        let srv = SRV::new(priority, weight, port, fqdn(target));
        self.records
            .push(Record::from_rdata(fqdn(name), TTL, RData::SRV(srv)));
        self
    }

    /// Register an A record for `name`.
    pub fn with_a(mut self, name: &str, ip: Ipv4Addr) -> Self {
        self.records
            .push(Record::from_rdata(fqdn(name), TTL, RData::A(A(ip))));
        self
    }

    fn answer(&self, request: &[u8]) -> Option<Vec<u8>> {
        let request = Message::from_bytes(request).ok()?;
        let query = request.queries().first()?.clone();

        let known = self
            .records
            .iter()
            .any(|record| record.name() == query.name());
        let answers: Vec<Record> = self
            .records
            .iter()
            .filter(|record| {
                record.name() == query.name() && record.record_type() == query.query_type()
            })
            .cloned()
            .collect();

        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Query)
            .set_authoritative(true)
            .set_recursion_desired(request.recursion_desired())
            .set_recursion_available(true)
            .set_response_code(if known {
                ResponseCode::NoError
            } else {
                ResponseCode::NXDomain
            })
            .add_query(query)
            .add_answers(answers);

        response.to_bytes().ok()
    }
}

fn fqdn(name: &str) -> Name {
    let mut name = Name::from_ascii(name).expect("invalid record name");
    name.set_fqdn(true);
    name
}

/// A nameserver on a free local port, answering UDP and TCP queries from a [`Zone`].
///
/// It is torn down when dropped.
pub struct FakeDns {
    address: SocketAddr,
    shutdown_handle: Option<tokio::sync::oneshot::Sender<()>>,
}

impl Drop for FakeDns {
    fn drop(&mut self) {
        if let Some(sender) = self.shutdown_handle.take() {
            let _res = sender.send(());
        }
    }
}

impl FakeDns {
    pub async fn start(zone: Zone) -> Self {
        let udp = UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("failed to bind udp socket");
        let address = udp.local_addr().expect("no local address");
        let tcp = TcpListener::bind(address)
            .await
            .expect("failed to bind tcplistener");
        tracing::info!("fake dns address: {}", address);

        let zone = Arc::new(zone);
        let udp_zone = zone.clone();
        let (shutdown_handle, shutdown) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            tokio::select! {
                _ = serve_udp(udp, udp_zone) => {}
                _ = serve_tcp(tcp, zone) => {}
                _ = shutdown => {}
            }
        });

        Self {
            address,
            shutdown_handle: Some(shutdown_handle),
        }
    }

    /// The nameserver address, as `ip:port`.
    pub fn address(&self) -> String {
        self.address.to_string()
    }
}

async fn serve_udp(socket: UdpSocket, zone: Arc<Zone>) {
    let mut buffer = [0u8; 4096];
    loop {
        let Ok((len, peer)) = socket.recv_from(&mut buffer).await else {
            return;
        };
        if let Some(response) = zone.answer(&buffer[..len]) {
            let _res = socket.send_to(&response, peer).await;
        }
    }
}

async fn serve_tcp(listener: TcpListener, zone: Arc<Zone>) {
    while let Ok((stream, _)) = listener.accept().await {
        tokio::spawn(serve_tcp_connection(stream, zone.clone()));
    }
}

// Messages over TCP are prefixed with their length as a big-endian u16.
async fn serve_tcp_connection(mut stream: TcpStream, zone: Arc<Zone>) {
    loop {
        let Ok(len) = stream.read_u16().await else {
            return;
        };
        let mut request = vec![0u8; usize::from(len)];
        if stream.read_exact(&mut request).await.is_err() {
            return;
        }
        let Some(response) = zone.answer(&request) else {
            return;
        };
        let Ok(len) = u16::try_from(response.len()) else {
            return;
        };
        if stream.write_u16(len).await.is_err() || stream.write_all(&response).await.is_err() {
            return;
        }
    }
}
