//! Mock resource source for testing without packaged payloads
//!
//! Resources live in memory. Individual resources can be made to have no
//! stream, or a stream that fails after a number of bytes; the whole source can
//! be made to fail enumeration or to read slowly.

use super::generator::MockDataGenerator;
use crate::core::error::{ChartError, Result};
use crate::resources::{ResourceSource, ResourceStream};
use std::io::{self, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// One simulated resource
#[derive(Debug, Clone)]
pub struct MockResource {
    /// Resource name
    pub name: String,
    /// Payload (`None` = listed but no stream can be opened)
    pub content: Option<Vec<u8>>,
    /// Fail the read once this many bytes have been delivered
    pub fail_after: Option<usize>,
    /// Panic inside `read` instead of returning an error
    pub panic_on_read: bool,
}

/// In-memory resource source with failure injection
#[derive(Debug, Default)]
pub struct MockResources {
    resources: Vec<MockResource>,
    enumeration_error: Option<String>,
    read_delay_ms: u64,
    opened: AtomicUsize,
}

impl MockResources {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Source with `count` seeded album payloads of `size` bytes
    pub fn generated(count: usize, size: usize, seed: u64) -> Self {
        let mut generator = MockDataGenerator::new(seed);
        generator
            .resources(count, size)
            .into_iter()
            .fold(Self::new(), |source, (name, bytes)| {
                source.with_resource(&name, bytes)
            })
    }

    /// Add a resource
    pub fn with_resource(mut self, name: &str, content: Vec<u8>) -> Self {
        self.resources.push(MockResource {
            name: name.to_string(),
            content: Some(content),
            fail_after: None,
            panic_on_read: false,
        });
        self
    }

    /// Add a resource that is listed but whose stream cannot be opened
    pub fn with_missing_stream(mut self, name: &str) -> Self {
        self.resources.push(MockResource {
            name: name.to_string(),
            content: None,
            fail_after: None,
            panic_on_read: false,
        });
        self
    }

    /// Make reads of an existing resource fail after `bytes` bytes
    pub fn with_failing_read(mut self, name: &str, bytes: usize) -> Self {
        for resource in self.resources.iter_mut().filter(|r| r.name == name) {
            resource.fail_after = Some(bytes);
        }
        self
    }

    /// Make reads of an existing resource panic
    pub fn with_panicking_read(mut self, name: &str) -> Self {
        for resource in self.resources.iter_mut().filter(|r| r.name == name) {
            resource.panic_on_read = true;
        }
        self
    }

    /// Make `resource_names` fail
    pub fn with_enumeration_failure(mut self, message: &str) -> Self {
        self.enumeration_error = Some(message.to_string());
        self
    }

    /// Sleep this long on every read call
    pub fn with_read_delay_ms(mut self, delay_ms: u64) -> Self {
        self.read_delay_ms = delay_ms;
        self
    }

    /// All simulated resources
    pub fn resources(&self) -> &[MockResource] {
        &self.resources
    }

    /// How many streams were handed out
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl ResourceSource for MockResources {
    fn source_name(&self) -> String {
        format!("mock resources ({} entries)", self.resources.len())
    }

    fn resource_names(&self) -> Result<Vec<String>> {
        if let Some(ref message) = self.enumeration_error {
            return Err(ChartError::Enumeration(message.clone()));
        }
        Ok(self.resources.iter().map(|r| r.name.clone()).collect())
    }

    fn open_resource(&self, name: &str) -> Option<ResourceStream<'_>> {
        let resource = self.resources.iter().find(|r| r.name == name)?;
        let content = resource.content.as_deref()?;
        self.opened.fetch_add(1, Ordering::SeqCst);

        Some(Box::new(MockStream {
            data: content,
            position: 0,
            fail_after: resource.fail_after,
            panic_on_read: resource.panic_on_read,
            delay: Duration::from_millis(self.read_delay_ms),
        }))
    }
}

/// Read stream over a borrowed payload with optional failure and delay
struct MockStream<'a> {
    data: &'a [u8],
    position: usize,
    fail_after: Option<usize>,
    panic_on_read: bool,
    delay: Duration,
}

impl Read for MockStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.panic_on_read {
            panic!("simulated panic while reading resource");
        }

        let limit = match self.fail_after {
            Some(limit) if self.position >= limit => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    "Simulated read failure",
                ));
            }
            Some(limit) => limit.min(self.data.len()),
            None => self.data.len(),
        };

        let available = limit.saturating_sub(self.position);
        let count = available.min(buf.len());
        buf[..count].copy_from_slice(&self.data[self.position..self.position + count]);
        self.position += count;
        Ok(count)
    }
}
