use battleship_core::{BitBoard, BitBoardError};

#[test]
fn test_try_new_sizes() {
    // Success for board that fits
    let ok = BitBoard::<u128, 10>::try_new();
    assert!(ok.is_ok());

    // Failure when board is too large
    let err = BitBoard::<u64, 10>::try_new();
    assert!(matches!(err, Err(BitBoardError::SizeTooLarge { n: 10, capacity: 64 })));
}

#[test]
fn test_get_set_and_bounds() {
    let mut bb = BitBoard::<u16, 4>::new();
    assert!(bb.is_empty());

    bb.set(1, 1).unwrap();
    assert!(bb.get(1, 1).unwrap());
    assert!(!bb.get(1, 2).unwrap());
    assert_eq!(bb.count_ones(), 1);

    assert_eq!(
        bb.set(4, 0).unwrap_err(),
        BitBoardError::IndexOutOfBounds { row: 4, col: 0 }
    );
    assert!(bb.get(0, 4).is_err());
}

#[test]
fn test_iter_set_bits_row_major() {
    let mut bb = BitBoard::<u16, 4>::new();
    bb.set(3, 3).unwrap();
    bb.set(0, 1).unwrap();
    let bits: Vec<_> = bb.iter_set_bits().collect();
    assert_eq!(bits, vec![(0, 1), (3, 3)]);
}

#[test]
fn test_from_raw_masks_upper_bits() {
    let bb = BitBoard::<u16, 3>::from_raw(u16::MAX);
    assert_eq!(bb.count_ones(), 9);
}

#[test]
fn test_overlap_ops() {
    let mut a = BitBoard::<u128, 10>::new();
    let mut b = BitBoard::<u128, 10>::new();
    a.set(2, 2).unwrap();
    b.set(2, 3).unwrap();
    assert!((a & b).is_empty());
    let both = a | b;
    assert_eq!(both.count_ones(), 2);
    a |= b;
    assert_eq!(a, both);
}
