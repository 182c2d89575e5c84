//! Allocation accounting for session-owned text.
//!
//! This binary installs a counting global allocator, so it holds a single
//! test to keep other threads from skewing the numbers.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicIsize, Ordering};

use gtranslate::{BodySink, Session, Transport, TransportRequest, TranslateResult};

struct CountingAlloc;

static LIVE_BYTES: AtomicIsize = AtomicIsize::new(0);

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            LIVE_BYTES.fetch_add(layout.size() as isize, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        LIVE_BYTES.fetch_sub(layout.size() as isize, Ordering::SeqCst);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            LIVE_BYTES.fetch_add(new_size as isize - layout.size() as isize, Ordering::SeqCst);
        }
        new_ptr
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn live() -> isize {
    LIVE_BYTES.load(Ordering::SeqCst)
}

struct Offline;

impl Transport for Offline {
    fn perform(
        &mut self,
        _request: &TransportRequest<'_>,
        _sink: &mut dyn BodySink,
    ) -> TranslateResult<()> {
        Ok(())
    }
}

const TEXT_SIZE: usize = 1 << 20;
const SLACK: isize = 64 * 1024;

#[test]
fn test_copy_then_reference_releases_copy() {
    let text = vec![b'x'; TEXT_SIZE];
    let baseline = live();

    let mut session = Session::with_transport(Offline);
    session.set_text_copy(&text).unwrap();
    let with_copy = live();
    assert!(with_copy - baseline >= TEXT_SIZE as isize);

    // A second copy replaces the first rather than adding to it.
    session.set_text_copy(&text).unwrap();
    assert!((live() - with_copy).abs() < SLACK);

    session.set_text_ref(&text);
    assert!(live() - baseline < SLACK, "owned copy was not released");
    assert_eq!(session.text().len(), TEXT_SIZE);

    session.set_text_copy_len(&text, TEXT_SIZE / 2).unwrap();
    assert!(live() - baseline >= (TEXT_SIZE / 2) as isize);

    drop(session);
    assert!(live() - baseline < SLACK, "session drop leaked the copy");
}
