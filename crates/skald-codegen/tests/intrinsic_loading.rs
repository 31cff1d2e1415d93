//! Intrinsic and literal loading across many calls.

use proptest::prelude::*;
use skald_codegen::{CodegenOptions, IntrinsicLibrary, intrinsic_table};
use skald_ir::Module;

#[test]
fn every_intrinsic_loads_after_its_prerequisites() {
    let library = IntrinsicLibrary::default();
    for record in intrinsic_table() {
        let mut module = Module::new("m");
        library.load_intrinsic(&mut module, record.name).unwrap();

        let order: Vec<&str> = module.declarations().map(|d| d.name.as_str()).collect();
        assert_eq!(order.last(), Some(&record.name));
        let own = order.len() - 1;
        for p in record.prerequisites {
            let at = order.iter().position(|n| n == p).unwrap();
            assert!(at < own, "{p} must precede {}", record.name);
        }
    }
}

#[test]
fn loading_everything_twice_adds_nothing() {
    let library = IntrinsicLibrary::default();
    let mut module = Module::new("m");
    for record in intrinsic_table() {
        library.load_intrinsic(&mut module, record.name).unwrap();
    }
    let loaded = module.clone();
    for record in intrinsic_table().iter().rev() {
        library.load_intrinsic(&mut module, record.name).unwrap();
    }
    assert_eq!(module, loaded);
    assert_eq!(module.declarations().count(), intrinsic_table().len());
}

proptest! {
    #[test]
    fn literal_names_depend_only_on_content(
        bytes in prop::collection::vec(any::<u8>(), 0..80),
        threshold in 0usize..64,
    ) {
        let library = IntrinsicLibrary::new(CodegenOptions { literal_hash_threshold: threshold });
        let mut module = Module::new("m");

        let first = library.gen_literal(&mut module, &bytes).unwrap();
        let second = library.gen_literal(&mut module, &bytes).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(module.globals().count(), 1);
        prop_assert!(first.starts_with("cstr."));

        let suffix = &first["cstr.".len()..];
        if bytes.len() <= threshold {
            prop_assert_eq!(suffix.len(), bytes.len() * 2);
        } else {
            prop_assert_eq!(suffix.len(), 32);
        }
    }
}
