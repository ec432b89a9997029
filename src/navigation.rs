//! Cursor arithmetic shared by the browser list and the image list.
//!
//! Every function returns `None` for an empty collection instead of dividing
//! by zero; callers treat that as a no-op.

/// One step forward or backward, wrapping at both ends.
#[must_use]
pub fn step(index: usize, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let next = if forward {
        (index + 1) % len
    } else {
        (index % len + len - 1) % len
    };
    Some(next)
}

/// Jump to the start of the next or previous page, wrapping around the list.
#[must_use]
pub fn page_jump(index: usize, len: usize, page_size: usize, forward: bool) -> Option<usize> {
    if len == 0 || page_size == 0 {
        return None;
    }
    let (index, len, page) = (index as i64, len as i64, page_size as i64);
    let page_no = index / page + if forward { 1 } else { -1 };
    let target = if forward {
        page_no * page
    } else {
        page_no * page + len
    };
    Some(target.rem_euclid(len) as usize)
}

/// First index of the page containing `index`.
#[must_use]
pub fn page_start(index: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    index / page_size * page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_then_prev_is_identity() {
        for len in 1..12 {
            for start in 0..len {
                let there = step(start, len, true).unwrap();
                assert_eq!(step(there, len, false), Some(start));
                let back = step(start, len, false).unwrap();
                assert_eq!(step(back, len, true), Some(start));
            }
        }
    }

    #[test]
    fn step_wraps_at_ends() {
        assert_eq!(step(4, 5, true), Some(0));
        assert_eq!(step(0, 5, false), Some(4));
    }

    #[test]
    fn empty_collection_is_a_no_op() {
        assert_eq!(step(0, 0, true), None);
        assert_eq!(page_jump(0, 0, 23, false), None);
    }

    #[test]
    fn page_jump_forward_from_first_page() {
        assert_eq!(page_jump(5, 50, 23, true), Some(23));
    }

    #[test]
    fn page_jump_forward_wraps() {
        assert_eq!(page_jump(47, 50, 23, true), Some(19));
    }

    #[test]
    fn page_jump_backward_from_second_page() {
        assert_eq!(page_jump(30, 50, 23, false), Some(0));
    }

    #[test]
    fn page_jump_backward_from_first_page_wraps() {
        // (0 - 1) * 23 + 50 = 27
        assert_eq!(page_jump(5, 50, 23, false), Some(27));
    }

    #[test]
    fn page_jump_stays_in_range_for_short_lists() {
        for len in 1..30 {
            for index in 0..len {
                for forward in [true, false] {
                    let target = page_jump(index, len, 23, forward).unwrap();
                    assert!(target < len, "len={len} index={index} -> {target}");
                }
            }
        }
    }

    #[test]
    fn forward_jump_lands_on_page_multiple_mod_len() {
        let len = 100;
        for index in 0..len {
            let target = page_jump(index, len, 23, true).unwrap();
            let expected = ((index / 23 + 1) * 23) % len;
            assert_eq!(target, expected);
        }
    }

    #[test]
    fn page_start_rounds_down() {
        assert_eq!(page_start(0, 23), 0);
        assert_eq!(page_start(22, 23), 0);
        assert_eq!(page_start(23, 23), 23);
        assert_eq!(page_start(50, 23), 46);
    }
}
