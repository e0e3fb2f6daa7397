use membound_core::{
    allocate, copy_bounded, read_line_bounded, release, AllocError, BoundedBuf, ReadLine,
};
use proptest::prelude::*;
use std::io::Cursor;

fn line_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>().prop_filter("no newline", |b| *b != b'\n'), 0..64)
}

proptest! {
    #[test]
    fn short_lines_are_read_exactly(capacity in 1usize..40, line in line_bytes()) {
        prop_assume!(line.len() < capacity);
        let mut input = line.clone();
        input.push(b'\n');

        let out = read_line_bounded(&mut Cursor::new(input), capacity).unwrap();
        let buf = match out {
            ReadLine::Complete(buf) => buf,
            other => return Err(TestCaseError::fail(format!("expected Complete, got {other:?}"))),
        };
        prop_assert_eq!(buf.as_bytes(), &line[..]);
    }

    #[test]
    fn long_lines_keep_exactly_n_minus_one(capacity in 1usize..40, line in line_bytes()) {
        prop_assume!(line.len() >= capacity);
        let out = read_line_bounded(&mut Cursor::new(line.clone()), capacity).unwrap();
        let buf = match out {
            ReadLine::Truncated(buf) => buf,
            other => return Err(TestCaseError::fail(format!("expected Truncated, got {other:?}"))),
        };
        prop_assert_eq!(buf.len(), capacity - 1);
        prop_assert_eq!(buf.as_bytes(), &line[..capacity - 1]);
        prop_assert!(buf.high_water() <= capacity);
    }

    #[test]
    fn copy_never_truncates(capacity in 0usize..40, source in prop::collection::vec(any::<u8>(), 0..64)) {
        match copy_bounded(&source, capacity) {
            Ok(buf) => {
                prop_assert!(source.len() <= capacity);
                prop_assert_eq!(buf.as_bytes(), &source[..]);
            }
            Err(_) => prop_assert!(source.len() > capacity),
        }
    }

    #[test]
    fn rejected_copy_leaves_destination_unmodified(
        initial in prop::collection::vec(any::<u8>(), 0..10),
        source in prop::collection::vec(any::<u8>(), 11..64),
    ) {
        let mut dest = BoundedBuf::with_capacity(10);
        dest.copy_from(&initial).unwrap();
        let before = dest.clone();

        prop_assert!(dest.copy_from(&source).is_err());
        prop_assert_eq!(dest, before);
    }

    #[test]
    fn released_handles_always_refuse(size in 1usize..256, offset in 0usize..256, byte in any::<u8>()) {
        let mut handle = allocate(size);
        release(&mut handle).unwrap();
        prop_assert_eq!(handle.read(offset), Err(AllocError::UseAfterRelease));
        prop_assert_eq!(handle.write(offset, byte), Err(AllocError::UseAfterRelease));
        prop_assert_eq!(release(&mut handle), Err(AllocError::UseAfterRelease));
    }
}
