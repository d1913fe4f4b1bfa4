use emu8_core::{Chip8, Chip8Error, Quirks};

fn assemble(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

fn machine(words: &[u16]) -> Chip8 {
    let mut chip8 = Chip8::with_seed(Quirks::default(), 0xC8);
    chip8.load_program(&assemble(words)).unwrap();
    chip8
}

#[test]
fn test_clear_load_and_spin() {
    let mut chip8 = machine(&[0x00E0, 0x6005, 0x1204]);
    for _ in 0..3 {
        chip8.step().unwrap();
    }
    assert_eq!(chip8.pc(), 0x204);
    assert_eq!(chip8.v(0x0), 5);
    assert!(chip8.frame_buffer().is_blank());

    for _ in 0..100 {
        chip8.step().unwrap();
        assert_eq!(chip8.pc(), 0x204);
    }
}

#[test]
fn test_jump_to_program_start_loops() {
    let mut chip8 = machine(&[0x00E0, 0x6005, 0x1200]);
    for _ in 0..3 {
        chip8.step().unwrap();
    }
    assert_eq!(chip8.pc(), 0x200);
    assert_eq!(chip8.v(0x0), 5);
    assert!(chip8.frame_buffer().is_blank());
}

#[test]
fn test_call_returns_to_following_instruction() {
    // 0x200 CALL 0x206; 0x202 LD V1, 0x01; 0x204 JP 0x204; 0x206 LD V0, 0x07; 0x208 RET
    let mut chip8 = machine(&[0x2206, 0x6101, 0x1204, 0x6007, 0x00EE]);
    chip8.step().unwrap();
    assert_eq!(chip8.pc(), 0x206);
    assert_eq!(chip8.stack().depth(), 1);
    chip8.step().unwrap();
    chip8.step().unwrap();
    assert_eq!(chip8.pc(), 0x202);
    assert_eq!(chip8.stack().depth(), 0);
    chip8.step().unwrap();
    assert_eq!((chip8.v(0x0), chip8.v(0x1)), (0x07, 0x01));
}

#[test]
fn test_sixteen_nested_calls_fit_and_seventeen_overflow() {
    // Each instruction calls the one after it
    let words: Vec<u16> = (0..17).map(|n| 0x2000 | (0x202 + 2 * n)).collect();
    let mut chip8 = machine(&words);
    for _ in 0..16 {
        chip8.step().unwrap();
    }
    assert_eq!(chip8.stack().depth(), 16);
    assert_eq!(chip8.step(), Err(Chip8Error::StackOverflow));
    assert_eq!(chip8.pc(), 0x220);
    assert_eq!(chip8.stack().depth(), 16);
}

#[test]
fn test_drawing_twice_erases_and_flags() {
    // I = glyph for V0; DRW V1, V2, 5 twice
    let mut chip8 = machine(&[0xF029, 0xD125, 0xD125]);
    chip8.step().unwrap();
    chip8.step().unwrap();
    assert!(!chip8.frame_buffer().is_blank());
    assert_eq!(chip8.v(0xF), 0);
    chip8.step().unwrap();
    assert!(chip8.frame_buffer().is_blank());
    assert_eq!(chip8.v(0xF), 1);
}

#[test]
fn test_wait_for_key_holds_until_pressed() {
    let mut chip8 = machine(&[0xF30A, 0x6001]);
    chip8.step().unwrap();
    for _ in 0..5 {
        chip8.tick_60hz();
        chip8.step().unwrap();
        assert_eq!(chip8.pc(), 0x200);
        assert!(chip8.is_waiting_for_key());
    }
    chip8.key_press(0x7).unwrap();
    chip8.step().unwrap();
    assert_eq!(chip8.v(0x3), 0x7);
    assert_eq!(chip8.pc(), 0x202);
    chip8.step().unwrap();
    assert_eq!(chip8.v(0x0), 0x1);
}

#[test]
fn test_seeded_random_is_reproducible() {
    let program = [0xC0FF, 0xC1FF, 0xC2FF, 0xC3FF];
    let run = || {
        let mut chip8 = machine(&program);
        for _ in 0..program.len() {
            chip8.step().unwrap();
        }
        (0..4).map(|x| chip8.v(x)).collect::<Vec<u8>>()
    };
    assert_eq!(run(), run());

    // Reloading replays the same sequence
    let mut chip8 = machine(&program);
    chip8.step().unwrap();
    let first = chip8.v(0x0);
    chip8.load_program(&assemble(&program)).unwrap();
    chip8.step().unwrap();
    assert_eq!(chip8.v(0x0), first);
}

#[test]
fn test_bcd_round_trips_through_registers() {
    // V5 = 254; I = 0x300; BCD V5; LD V2, [I]
    let mut chip8 = machine(&[0x65FE, 0xA300, 0xF533, 0xF265]);
    for _ in 0..4 {
        chip8.step().unwrap();
    }
    assert_eq!((chip8.v(0x0), chip8.v(0x1), chip8.v(0x2)), (2, 5, 4));
    assert_eq!(chip8.i(), 0x303);
}

#[test]
fn test_unknown_instruction_depends_on_strictness() {
    let program = assemble(&[0xFFFF, 0x6001]);

    let mut strict = Chip8::new(Quirks::default());
    strict.load_program(&program).unwrap();
    assert_eq!(
        strict.step(),
        Err(Chip8Error::UnknownInstruction {
            word: 0xFFFF,
            address: 0x200
        })
    );

    let mut permissive = Chip8::new(Quirks::default().permissive());
    permissive.load_program(&program).unwrap();
    permissive.step().unwrap();
    permissive.step().unwrap();
    assert_eq!(permissive.v(0x0), 0x1);
}

#[test]
fn test_empty_program_runs_into_sys_noops() {
    let mut chip8 = machine(&[]);
    chip8.step().unwrap();
    assert_eq!(chip8.pc(), 0x202);
}
