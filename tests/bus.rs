use sensorlink::bus::error::Error;
use sensorlink::bus::transaction::{Config, Driver};
use sensorlink::bus::{AddressMode, BusController, Event, EventSlot};
use sensorlink::time::DelayMs;
use std::cell::RefCell;
use std::rc::Rc;

const PERIPHERAL_ADDRESS: u8 = 0x44;

/// What the mock controller does when a transfer is started.
#[derive(Clone, Copy)]
enum Completion {
    /// Signal this event before the first poll, like a fast interrupt.
    Signal(Event),
    /// Never signal anything; the poll loop must give up on its own.
    Silent,
    /// Refuse to start the transfer at all.
    Reject,
}

#[derive(Default)]
struct ControllerLog {
    open_calls: u32,
    close_calls: u32,
    bound: Option<(u8, AddressMode)>,
    written: Vec<Vec<u8>>,
    read_lengths: Vec<usize>,
}

struct MockController<'a> {
    slot: &'a EventSlot,
    on_write: Completion,
    on_read: Completion,
    read_data: [u8; 4],
    fail_open: bool,
    fail_bind: bool,
    log: Rc<RefCell<ControllerLog>>,
}

impl<'a> MockController<'a> {
    fn new(slot: &'a EventSlot, log: Rc<RefCell<ControllerLog>>) -> Self {
        Self {
            slot,
            on_write: Completion::Signal(Event::TransmitComplete),
            on_read: Completion::Signal(Event::ReceiveComplete),
            read_data: [0; 4],
            fail_open: false,
            fail_bind: false,
            log,
        }
    }
}

impl BusController for MockController<'_> {
    type Error = ();

    fn open(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().open_calls += 1;
        if self.fail_open { Err(()) } else { Ok(()) }
    }

    fn bind_address(&mut self, address: u8, mode: AddressMode) -> Result<(), Self::Error> {
        if self.fail_bind {
            return Err(());
        }
        self.log.borrow_mut().bound = Some((address, mode));
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.log.borrow_mut().written.push(bytes.to_vec());
        match self.on_write {
            Completion::Reject => Err(()),
            Completion::Silent => Ok(()),
            Completion::Signal(event) => {
                self.slot.signal(event);
                Ok(())
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.log.borrow_mut().read_lengths.push(buf.len());
        match self.on_read {
            Completion::Reject => Err(()),
            Completion::Silent => Ok(()),
            Completion::Signal(event) => {
                let len = buf.len().min(self.read_data.len());
                buf[..len].copy_from_slice(&self.read_data[..len]);
                self.slot.signal(event);
                Ok(())
            }
        }
    }

    fn close(&mut self) {
        self.log.borrow_mut().close_calls += 1;
    }
}

struct MockDelay {
    pauses: Rc<RefCell<Vec<u32>>>,
}

impl DelayMs for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.pauses.borrow_mut().push(ms);
    }
}

struct Harness {
    log: Rc<RefCell<ControllerLog>>,
    pauses: Rc<RefCell<Vec<u32>>>,
}

impl Harness {
    fn driver<'a>(
        &self,
        slot: &'a EventSlot,
        configure: impl FnOnce(&mut MockController<'a>),
    ) -> Driver<'a, MockController<'a>, MockDelay> {
        let mut controller = MockController::new(slot, Rc::clone(&self.log));
        configure(&mut controller);
        let delay = MockDelay {
            pauses: Rc::clone(&self.pauses),
        };
        Driver::new(controller, delay, slot, PERIPHERAL_ADDRESS, Config::default())
    }

    fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(ControllerLog::default())),
            pauses: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

#[test]
fn initialize_binds_seven_bit_address() {
    let slot = EventSlot::new();
    let harness = Harness::new();
    let mut driver = harness.driver(&slot, |_| {});

    driver.initialize().unwrap();
    assert!(driver.is_initialized());
    let log = harness.log.borrow();
    assert_eq!(log.open_calls, 1);
    assert_eq!(log.bound, Some((PERIPHERAL_ADDRESS, AddressMode::SevenBit)));
}

#[test]
fn open_rejection_is_reported() {
    let slot = EventSlot::new();
    let harness = Harness::new();
    let mut driver = harness.driver(&slot, |c| c.fail_open = true);

    assert_eq!(driver.initialize(), Err(Error::OpenFailed));
    assert!(!driver.is_initialized());
}

#[test]
fn bind_rejection_closes_the_bus() {
    let slot = EventSlot::new();
    let harness = Harness::new();
    let mut driver = harness.driver(&slot, |c| c.fail_bind = true);

    assert_eq!(driver.initialize(), Err(Error::AddressRejected));
    assert_eq!(harness.log.borrow().close_calls, 1);
}

#[test]
fn write_succeeds_on_transmit_complete() {
    let slot = EventSlot::new();
    let harness = Harness::new();
    let mut driver = harness.driver(&slot, |_| {});

    driver.initialize().unwrap();
    driver.write_command(&[0x00]).unwrap();

    let log = harness.log.borrow();
    assert_eq!(log.written, vec![vec![0x00]]);
    assert_eq!(log.close_calls, 0);
    // Completion arrived before the first poll, so no pacing was needed.
    assert!(harness.pauses.borrow().is_empty());
}

#[test]
fn silent_completion_times_out_and_tears_down() {
    let slot = EventSlot::new();
    let harness = Harness::new();
    let mut driver = harness.driver(&slot, |c| c.on_write = Completion::Silent);

    driver.initialize().unwrap();
    assert_eq!(driver.write_command(&[0x00]), Err(Error::Timeout));
    assert!(!driver.is_initialized());
    assert_eq!(harness.log.borrow().close_calls, 1);

    // Full poll budget spent at 1 ms granularity.
    let pauses = harness.pauses.borrow();
    assert_eq!(pauses.len(), 1000);
    assert!(pauses.iter().all(|&ms| ms == 1));
}

#[test]
fn transaction_after_teardown_requires_reinitialize() {
    let slot = EventSlot::new();
    let harness = Harness::new();
    let mut driver = harness.driver(&slot, |c| c.on_write = Completion::Silent);

    driver.initialize().unwrap();
    assert_eq!(driver.write_command(&[0x00]), Err(Error::Timeout));
    assert_eq!(driver.write_command(&[0x00]), Err(Error::NotInitialized));
    assert_eq!(driver.read_bytes(&mut [0u8; 4]), Err(Error::NotInitialized));

    driver.initialize().unwrap();
    assert!(driver.is_initialized());
}

#[test]
fn wrong_event_aborts_distinct_from_timeout() {
    let slot = EventSlot::new();
    let harness = Harness::new();
    let mut driver =
        harness.driver(&slot, |c| c.on_write = Completion::Signal(Event::ReceiveComplete));

    driver.initialize().unwrap();
    let outcome = driver.write_command(&[0x00]);
    assert_eq!(outcome, Err(Error::Aborted(Event::ReceiveComplete)));
    assert_ne!(outcome, Err(Error::Timeout));
    assert_eq!(harness.log.borrow().close_calls, 1);
}

#[test]
fn controller_abort_event_is_surfaced() {
    let slot = EventSlot::new();
    let harness = Harness::new();
    let mut driver = harness.driver(&slot, |c| c.on_read = Completion::Signal(Event::Aborted));

    driver.initialize().unwrap();
    let mut buf = [0u8; 4];
    assert_eq!(driver.read_bytes(&mut buf), Err(Error::Aborted(Event::Aborted)));
}

#[test]
fn rejected_transfer_tears_down() {
    let slot = EventSlot::new();
    let harness = Harness::new();
    let mut driver = harness.driver(&slot, |c| c.on_write = Completion::Reject);

    driver.initialize().unwrap();
    assert_eq!(driver.write_command(&[0x00]), Err(Error::TransferRejected));
    assert!(!driver.is_initialized());
    assert_eq!(harness.log.borrow().close_calls, 1);
}

#[test]
fn read_validates_receive_complete_and_fills_buffer() {
    let slot = EventSlot::new();
    let harness = Harness::new();
    let mut driver = harness.driver(&slot, |c| c.read_data = [0x12, 0x34, 0x56, 0x78]);

    driver.initialize().unwrap();
    let mut buf = [0u8; 4];
    driver.read_bytes(&mut buf).unwrap();
    assert_eq!(buf, [0x12, 0x34, 0x56, 0x78]);
    assert_eq!(harness.log.borrow().read_lengths, vec![4]);
}

#[test]
fn custom_poll_budget_is_honoured() {
    let slot = EventSlot::new();
    let harness = Harness::new();
    let mut controller = MockController::new(&slot, Rc::clone(&harness.log));
    controller.on_write = Completion::Silent;
    let delay = MockDelay {
        pauses: Rc::clone(&harness.pauses),
    };
    let config = Config {
        poll_interval_ms: 5,
        poll_budget: 7,
    };
    let mut driver = Driver::new(controller, delay, &slot, PERIPHERAL_ADDRESS, config);

    driver.initialize().unwrap();
    assert_eq!(driver.write_command(&[0x00]), Err(Error::Timeout));
    let pauses = harness.pauses.borrow();
    assert_eq!(pauses.len(), 7);
    assert!(pauses.iter().all(|&ms| ms == 5));
}
