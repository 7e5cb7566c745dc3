    use super::*;

    #[test]
    fn editing_uses_char_positions() {
        let mut input = Input::default();
        for c in "héllo".chars() {
            input.insert_char(c);
        }
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.buf, "hélo");
        assert_eq!(input.cursor, 2);
        input.delete();
        assert_eq!(input.buf, "héo");
        input.move_right();
        input.move_right();
        input.move_right();
        assert_eq!(input.cursor, 3);
        input.delete();
        assert_eq!(input.buf, "héo");
    }

    #[test]
    fn backspace_at_start_is_a_no_op() {
        let mut input = Input::default();
        input.set("ab".to_string());
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.buf, "ab");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn history_walks_back_and_forth() {
        let mut input = Input::default();
        input.push_history("abort");
        input.push_history("abort");
        input.push_history("  ");
        input.push_history("model");
        assert_eq!(input.history, vec!["abort", "model"]);

        input.history_up();
        assert_eq!(input.buf, "model");
        input.history_up();
        assert_eq!(input.buf, "abort");
        input.history_up();
        assert_eq!(input.buf, "abort");
        input.history_down();
        assert_eq!(input.buf, "model");
        input.history_down();
        assert_eq!(input.buf, "");
        assert_eq!(input.history_pos, None);
    }
