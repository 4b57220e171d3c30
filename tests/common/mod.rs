//! Shared fakes and mock servers for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, U256};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

use gated_board::attestation::{AttestationError, AttestationResult, ClaimData};
use gated_board::blockchain::{BlockchainError, BlockchainResult, WalletError};
use gated_board::board::{
    AttestationService, BoardController, ChainReader, GatePolicy, SequencerTimeouts,
    WalletConnector,
};

pub const MIN_BALANCE: u64 = 100;

pub fn token() -> Address {
    Address::repeat_byte(0x70)
}

/// Anvil's first account.
pub fn alice() -> Address {
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
}

pub fn bob() -> Address {
    "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap()
}

pub fn gate() -> GatePolicy {
    GatePolicy {
        token: token(),
        min_balance: U256::from(MIN_BALANCE),
        chain_id: 31337,
    }
}

pub fn short_timeouts() -> SequencerTimeouts {
    SequencerTimeouts {
        wallet: Duration::from_millis(300),
        balance: Duration::from_millis(300),
        attestation: Duration::from_millis(300),
    }
}

pub type TestBoard = BoardController<Arc<FakeWallet>, Arc<FakeChain>, Arc<FakeAttestations>>;

/// Build a board over the fakes. Pass an `Arc` clone to keep inspecting a fake.
pub fn board(
    wallet: impl Into<Arc<FakeWallet>>,
    chain: impl Into<Arc<FakeChain>>,
    attestations: impl Into<Arc<FakeAttestations>>,
) -> TestBoard {
    BoardController::new(
        gate(),
        short_timeouts(),
        wallet.into(),
        chain.into(),
        attestations.into(),
    )
}

/// A point where a fake pauses until the test lets it continue.
#[derive(Debug, Default)]
pub struct Hold {
    entered: Notify,
    release: Notify,
}

impl Hold {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Wait until the fake has reached the hold.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[derive(Debug, Clone)]
pub enum WalletBehavior {
    Accounts(Vec<Address>),
    Decline,
    /// Provider disappears between the availability check and the request.
    Vanish,
    Fail,
    Hang,
}

#[derive(Debug)]
pub struct FakeWallet {
    available: AtomicBool,
    behavior: Mutex<WalletBehavior>,
    pub calls: AtomicUsize,
}

impl FakeWallet {
    pub fn with(behavior: WalletBehavior) -> Self {
        Self {
            available: AtomicBool::new(true),
            behavior: Mutex::new(behavior),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn account(address: Address) -> Self {
        Self::with(WalletBehavior::Accounts(vec![address]))
    }

    pub fn absent() -> Self {
        let wallet = Self::with(WalletBehavior::Accounts(Vec::new()));
        wallet.set_available(false);
        wallet
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_behavior(&self, behavior: WalletBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }
}

impl WalletConnector for FakeWallet {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            WalletBehavior::Accounts(accounts) => Ok(accounts),
            WalletBehavior::Decline => Err(WalletError::Rejected("user rejected the request".into())),
            WalletBehavior::Vanish => Err(WalletError::Unavailable),
            WalletBehavior::Fail => Err(WalletError::Chain(BlockchainError::Rpc("node down".into()))),
            WalletBehavior::Hang => std::future::pending().await,
        }
    }
}

#[derive(Debug)]
pub struct FakeChain {
    /// `None` makes every lookup fail.
    balance: Mutex<Option<U256>>,
    hang: AtomicBool,
    hold: Mutex<Option<Arc<Hold>>>,
    pub lookups: Mutex<Vec<(Address, Address)>>,
}

impl FakeChain {
    pub fn balance(balance: u64) -> Self {
        Self {
            balance: Mutex::new(Some(U256::from(balance))),
            hang: AtomicBool::new(false),
            hold: Mutex::new(None),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        let chain = Self::balance(0);
        *chain.balance.lock().unwrap() = None;
        chain
    }

    pub fn hanging() -> Self {
        let chain = Self::balance(0);
        chain.hang.store(true, Ordering::SeqCst);
        chain
    }

    pub fn set_balance(&self, balance: u64) {
        *self.balance.lock().unwrap() = Some(U256::from(balance));
    }

    /// Pause the next lookups at `hold`.
    pub fn hold_at(&self, hold: Arc<Hold>) {
        *self.hold.lock().unwrap() = Some(hold);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

impl ChainReader for FakeChain {
    async fn token_balance(&self, token: Address, owner: Address) -> BlockchainResult<U256> {
        self.lookups.lock().unwrap().push((token, owner));
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let hold = self.hold.lock().unwrap().clone();
        if let Some(hold) = hold {
            hold.pass().await;
        }
        let balance = *self.balance.lock().unwrap();
        balance.ok_or_else(|| BlockchainError::Rpc("execution reverted".into()))
    }
}

#[derive(Debug, Clone)]
pub enum AttestationReply {
    Uid(String),
    Empty,
    Fail,
    Hang,
}

/// Attestation fake. Unscripted calls succeed with `att-<n>`.
#[derive(Debug, Default)]
pub struct FakeAttestations {
    script: Mutex<VecDeque<AttestationReply>>,
    holds: Mutex<VecDeque<Arc<Hold>>>,
    pub calls: Mutex<Vec<(Address, ClaimData)>>,
}

impl FakeAttestations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(replies: impl IntoIterator<Item = AttestationReply>) -> Self {
        let fake = Self::new();
        fake.script.lock().unwrap().extend(replies);
        fake
    }

    pub fn push_reply(&self, reply: AttestationReply) {
        self.script.lock().unwrap().push_back(reply);
    }

    /// Pause the next call (one hold per call, in call order).
    pub fn hold_next(&self, hold: Arc<Hold>) {
        self.holds.lock().unwrap().push_back(hold);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl AttestationService for FakeAttestations {
    async fn issue_attestation(&self, recipient: Address, claim: ClaimData) -> AttestationResult<String> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((recipient, claim));
            calls.len()
        };
        let hold = self.holds.lock().unwrap().pop_front();
        if let Some(hold) = hold {
            hold.pass().await;
        }

        let reply = self.script.lock().unwrap().pop_front();
        match reply {
            None => Ok(format!("att-{}", n)),
            Some(AttestationReply::Uid(uid)) => Ok(uid),
            Some(AttestationReply::Empty) => Ok(String::new()),
            Some(AttestationReply::Fail) => Err(AttestationError::Status {
                status: 500,
                body: "schema not found".into(),
            }),
            Some(AttestationReply::Hang) => std::future::pending().await,
        }
    }
}

/// A request captured by the programmable backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request line and headers.
    pub head: String,
    pub body: String,
}

/// Start a programmable HTTP backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..end]).to_string();
    Some(RecordedRequest { head, body })
}
