//! In-memory provider, key store and remote shell for service-level tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use anyhow::Result;
use dodocker_cli::application::ports::{
    ConnectError, HostProvider, HostSpec, KeyRegistry, LocalKeyStore, ProgressReporter,
    RemoteOutput, RemoteShell, ShellSession, ShellTarget,
};
use dodocker_cli::domain::{Host, HostState, KeyRecord, LocalKey};

pub const BOOTED_ADDRESS: &str = "203.0.113.10";

// ── Remote output constructors ───────────────────────────────────────────────

pub fn ok(stdout: &str) -> RemoteOutput {
    RemoteOutput {
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn fail(code: i32, stderr: &str) -> RemoteOutput {
    RemoteOutput {
        exit_code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

pub fn host(id: u64, name: &str, state: HostState, address: Option<&str>) -> Host {
    Host {
        id,
        name: name.to_string(),
        state,
        address: address.map(str::to_owned),
    }
}

// ── Cloud provider ───────────────────────────────────────────────────────────

/// Droplets created here stay pending for `boot_after` list calls, then turn
/// active with [`BOOTED_ADDRESS`].
#[derive(Default)]
pub struct FakeCloud {
    pub hosts: RefCell<Vec<Host>>,
    pub keys: RefCell<Vec<KeyRecord>>,
    pub boot_after: u32,
    pub list_calls: Cell<u32>,
    pub creates: RefCell<Vec<String>>,
    pub created_with_key: RefCell<Vec<String>>,
    pub registered: RefCell<Vec<String>>,
    pub deregistered: RefCell<Vec<u64>>,
    pending_lists: Cell<u32>,
    next_id: Cell<u64>,
}

impl FakeCloud {
    pub fn with_hosts(hosts: Vec<Host>) -> Self {
        Self {
            hosts: RefCell::new(hosts),
            ..Self::default()
        }
    }

    pub fn booting_after(mut self, lists: u32) -> Self {
        self.boot_after = lists;
        self
    }

    pub fn with_key(self, record: KeyRecord) -> Self {
        self.keys.borrow_mut().push(record);
        self
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 100;
        self.next_id.set(self.next_id.get() + 1);
        id
    }
}

impl HostProvider for FakeCloud {
    async fn list_hosts(&self) -> Result<Vec<Host>> {
        self.list_calls.set(self.list_calls.get() + 1);
        let mut hosts = self.hosts.borrow_mut();
        if hosts.iter().any(|h| h.state == HostState::Pending) {
            if self.pending_lists.get() >= self.boot_after {
                for h in hosts.iter_mut().filter(|h| h.state == HostState::Pending) {
                    h.state = HostState::Active;
                    h.address = Some(BOOTED_ADDRESS.to_string());
                }
            } else {
                self.pending_lists.set(self.pending_lists.get() + 1);
            }
        }
        Ok(hosts.clone())
    }

    async fn create_host(&self, spec: &HostSpec<'_>) -> Result<Host> {
        self.creates.borrow_mut().push(spec.name.to_string());
        self.created_with_key
            .borrow_mut()
            .push(spec.ssh_key_fingerprint.to_string());
        let created = host(self.next_id(), spec.name, HostState::Pending, None);
        self.hosts.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn delete_host(&self, id: u64) -> Result<()> {
        self.hosts.borrow_mut().retain(|h| h.id != id);
        Ok(())
    }
}

impl KeyRegistry for FakeCloud {
    async fn list_keys(&self) -> Result<Vec<KeyRecord>> {
        Ok(self.keys.borrow().clone())
    }

    async fn register_key(&self, name: &str, public_key: &str) -> Result<KeyRecord> {
        self.registered.borrow_mut().push(name.to_string());
        let record = KeyRecord {
            id: self.next_id(),
            name: name.to_string(),
            fingerprint: fingerprint_of(public_key),
        };
        self.keys.borrow_mut().push(record.clone());
        Ok(record)
    }

    async fn deregister_key(&self, id: u64) -> Result<()> {
        self.deregistered.borrow_mut().push(id);
        self.keys.borrow_mut().retain(|k| k.id != id);
        Ok(())
    }
}

/// Deterministic stand-in for an MD5 fingerprint.
pub fn fingerprint_of(public_key: &str) -> String {
    let n = public_key.bytes().fold(0u8, u8::wrapping_add);
    format!("aa:bb:{n:02x}")
}

// ── Local key store ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeKeys {
    pub keys: RefCell<HashMap<String, LocalKey>>,
    pub generated: Cell<u32>,
}

impl FakeKeys {
    pub fn with(name: &str, public_key: &str) -> Self {
        let store = Self::default();
        store.keys.borrow_mut().insert(
            name.to_string(),
            LocalKey {
                public_key: public_key.to_string(),
                fingerprint: fingerprint_of(public_key),
            },
        );
        store
    }
}

impl LocalKeyStore for FakeKeys {
    async fn load(&self, name: &str) -> Result<Option<LocalKey>> {
        Ok(self.keys.borrow().get(name).cloned())
    }

    async fn generate(&self, name: &str) -> Result<LocalKey> {
        self.generated.set(self.generated.get() + 1);
        let public_key = format!("ssh-rsa GENERATED{} {name}", self.generated.get());
        let key = LocalKey {
            fingerprint: fingerprint_of(&public_key),
            public_key,
        };
        self.keys.borrow_mut().insert(name.to_string(), key.clone());
        Ok(key)
    }

    fn private_key_path(&self, name: &str) -> PathBuf {
        PathBuf::from("/keys").join(format!("{name}.pem"))
    }
}

// ── Remote shell ─────────────────────────────────────────────────────────────

/// Per-command queues of canned replies. Unscripted commands succeed with
/// empty output.
#[derive(Default)]
pub struct Script {
    replies: RefCell<HashMap<String, VecDeque<RemoteOutput>>>,
    pub log: RefCell<Vec<String>>,
}

impl Script {
    pub fn reply(self, command: &str, outputs: Vec<RemoteOutput>) -> Self {
        self.replies
            .borrow_mut()
            .insert(command.to_string(), outputs.into());
        self
    }

    pub fn ran(&self, command: &str) -> usize {
        self.log.borrow().iter().filter(|c| *c == command).count()
    }
}

impl ShellSession for &Script {
    async fn run(&self, command: &str) -> Result<RemoteOutput> {
        self.log.borrow_mut().push(command.to_string());
        let next = self
            .replies
            .borrow_mut()
            .get_mut(command)
            .and_then(VecDeque::pop_front);
        Ok(next.unwrap_or_else(|| ok("")))
    }
}

/// Refuses the first `refusals` connections, then hands out the script.
pub struct ScriptedShell<'s> {
    pub script: &'s Script,
    pub refusals: Cell<u32>,
    pub connects: Cell<u32>,
    pub addresses: RefCell<Vec<String>>,
}

impl<'s> ScriptedShell<'s> {
    pub fn new(script: &'s Script) -> Self {
        Self {
            script,
            refusals: Cell::new(0),
            connects: Cell::new(0),
            addresses: RefCell::new(Vec::new()),
        }
    }

    pub fn refusing(self, n: u32) -> Self {
        self.refusals.set(n);
        self
    }
}

impl<'s> RemoteShell for ScriptedShell<'s> {
    type Session = &'s Script;

    async fn connect(&self, target: &ShellTarget<'_>) -> Result<Self::Session, ConnectError> {
        self.connects.set(self.connects.get() + 1);
        self.addresses.borrow_mut().push(target.address.to_string());
        if self.refusals.get() > 0 {
            self.refusals.set(self.refusals.get() - 1);
            return Err(ConnectError::Unreachable("Connection refused".into()));
        }
        Ok(self.script)
    }
}

// ── Reporter ─────────────────────────────────────────────────────────────────

/// Records every reported line, prefixed by kind.
#[derive(Default)]
pub struct Recorder {
    pub lines: RefCell<Vec<String>>,
}

impl Recorder {
    pub fn saw(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }

    pub fn count(&self, needle: &str) -> usize {
        self.lines.borrow().iter().filter(|l| l.contains(needle)).count()
    }
}

impl ProgressReporter for Recorder {
    fn step(&self, message: &str) {
        self.lines.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.lines.borrow_mut().push(format!("ok: {message}"));
    }
    fn warn(&self, message: &str) {
        self.lines.borrow_mut().push(format!("warn: {message}"));
    }
}

mockall::mock! {
    pub Reporter {}
    impl ProgressReporter for Reporter {
        fn step(&self, message: &str);
        fn success(&self, message: &str);
        fn warn(&self, message: &str);
    }
}
