//! Runtime intrinsics and read-only string literals.
//!
//! Generated code calls into a small set of runtime functions. Their
//! declarations live in a static table sorted by name; loading one into a
//! module first loads everything it depends on, and loading the same name
//! twice is a no-op.

use md5::{Digest, Md5};
use skald_ir::Module;
use tracing::debug;

use crate::error::{CodegenError, CodegenResult};

/// Most prerequisites a single table entry may list.
pub const MAX_PREREQUISITES: usize = 4;

/// Literals longer than this many bytes get a hashed symbol name by default.
pub const DEFAULT_LITERAL_HASH_THRESHOLD: usize = 32;

/// Prefix of every generated literal symbol.
pub const LITERAL_PREFIX: &str = "cstr.";

/// One entry in the intrinsic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntrinsicRecord {
    /// Symbol name.
    pub name: &'static str,
    /// Entries that must be present first, in load order.
    pub prerequisites: &'static [&'static str],
    /// Declaration or definition text.
    pub code: &'static str,
}

const fn record(
    name: &'static str,
    prerequisites: &'static [&'static str],
    code: &'static str,
) -> IntrinsicRecord {
    IntrinsicRecord {
        name,
        prerequisites,
        code,
    }
}

const QUBIT: &[&str] = &["Qubit"];

/// The intrinsic table. Must stay sorted by name.
static INTRINSIC_TABLE: &[IntrinsicRecord] = &[
    record("Qubit", &[], "%Qubit = type opaque"),
    record("Result", &[], "%Result = type opaque"),
    record(
        "__quantum__qis__ccx__body",
        QUBIT,
        "declare void @__quantum__qis__ccx__body(%Qubit*, %Qubit*, %Qubit*)",
    ),
    record(
        "__quantum__qis__cnot__body",
        QUBIT,
        "declare void @__quantum__qis__cnot__body(%Qubit*, %Qubit*)",
    ),
    record(
        "__quantum__qis__cz__body",
        QUBIT,
        "declare void @__quantum__qis__cz__body(%Qubit*, %Qubit*)",
    ),
    record(
        "__quantum__qis__h__body",
        QUBIT,
        "declare void @__quantum__qis__h__body(%Qubit*)",
    ),
    record(
        "__quantum__qis__mz__body",
        &["Qubit", "Result", "__quantum__rt__result_record_output"],
        "declare void @__quantum__qis__mz__body(%Qubit*, %Result*) #1",
    ),
    record(
        "__quantum__qis__reset__body",
        QUBIT,
        "declare void @__quantum__qis__reset__body(%Qubit*)",
    ),
    record(
        "__quantum__qis__rx__body",
        QUBIT,
        "declare void @__quantum__qis__rx__body(double, %Qubit*)",
    ),
    record(
        "__quantum__qis__ry__body",
        QUBIT,
        "declare void @__quantum__qis__ry__body(double, %Qubit*)",
    ),
    record(
        "__quantum__qis__rz__body",
        QUBIT,
        "declare void @__quantum__qis__rz__body(double, %Qubit*)",
    ),
    record(
        "__quantum__qis__s__adj",
        QUBIT,
        "declare void @__quantum__qis__s__adj(%Qubit*)",
    ),
    record(
        "__quantum__qis__s__body",
        QUBIT,
        "declare void @__quantum__qis__s__body(%Qubit*)",
    ),
    record(
        "__quantum__qis__swap__body",
        QUBIT,
        "declare void @__quantum__qis__swap__body(%Qubit*, %Qubit*)",
    ),
    record(
        "__quantum__qis__t__adj",
        QUBIT,
        "declare void @__quantum__qis__t__adj(%Qubit*)",
    ),
    record(
        "__quantum__qis__t__body",
        QUBIT,
        "declare void @__quantum__qis__t__body(%Qubit*)",
    ),
    record(
        "__quantum__qis__x__body",
        QUBIT,
        "declare void @__quantum__qis__x__body(%Qubit*)",
    ),
    record(
        "__quantum__qis__y__body",
        QUBIT,
        "declare void @__quantum__qis__y__body(%Qubit*)",
    ),
    record(
        "__quantum__qis__z__body",
        QUBIT,
        "declare void @__quantum__qis__z__body(%Qubit*)",
    ),
    record(
        "__quantum__rt__initialize",
        &[],
        "declare void @__quantum__rt__initialize(i8*)",
    ),
    record(
        "__quantum__rt__result_record_output",
        &["Result"],
        "declare void @__quantum__rt__result_record_output(%Result*, i8*)",
    ),
    // No translator emits the three entries below; they exercise loading
    // of an entry with several prerequisites.
    record(
        "__skald_copy_bytes",
        &["llvm.memcpy.p0i8.p0i8.i64", "malloc"],
        r"define internal i8* @__skald_copy_bytes(i8* %src, i64 %len) {
entry:
  %dst = call i8* @malloc(i64 %len)
  call void @llvm.memcpy.p0i8.p0i8.i64(i8* %dst, i8* %src, i64 %len, i1 false)
  ret i8* %dst
}",
    ),
    record(
        "llvm.memcpy.p0i8.p0i8.i64",
        &[],
        "declare void @llvm.memcpy.p0i8.p0i8.i64(i8*, i8*, i64, i1)",
    ),
    record("malloc", &[], "declare i8* @malloc(i64)"),
];

/// The whole table, in name order.
pub fn intrinsic_table() -> &'static [IntrinsicRecord] {
    INTRINSIC_TABLE
}

/// True if the table is strictly ascending by name.
pub fn table_is_sorted() -> bool {
    INTRINSIC_TABLE.windows(2).all(|w| w[0].name < w[1].name)
}

/// Find a table entry by name.
pub fn lookup_intrinsic(name: &str) -> Option<&'static IntrinsicRecord> {
    debug_assert!(table_is_sorted(), "intrinsic table must be sorted");
    INTRINSIC_TABLE
        .binary_search_by(|r| r.name.cmp(name))
        .ok()
        .map(|i| &INTRINSIC_TABLE[i])
}

/// Code-generation knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Literals up to this many bytes are named by their hex content;
    /// longer ones by an MD5 digest.
    pub literal_hash_threshold: usize,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            literal_hash_threshold: DEFAULT_LITERAL_HASH_THRESHOLD,
        }
    }
}

/// Loads intrinsics and literals into modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrinsicLibrary {
    options: CodegenOptions,
}

impl IntrinsicLibrary {
    /// Create a library with the given options.
    pub fn new(options: CodegenOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> CodegenOptions {
        self.options
    }

    /// Make `name` and everything it depends on available in `module`.
    ///
    /// Prerequisites are loaded depth-first, before the entry itself. A name
    /// already present in the module is left alone.
    pub fn load_intrinsic(&self, module: &mut Module, name: &str) -> CodegenResult<()> {
        if module.contains_symbol(name) {
            return Ok(());
        }
        let record =
            lookup_intrinsic(name).ok_or_else(|| CodegenError::UnknownIntrinsic(name.to_string()))?;
        for prerequisite in record.prerequisites {
            self.load_intrinsic(module, prerequisite)?;
        }
        debug!(intrinsic = name, "loading intrinsic");
        module.push_declaration(record.name, record.code)?;
        Ok(())
    }

    /// Name a literal by its content.
    ///
    /// Short literals map to the uppercase hex of their bytes. Longer ones
    /// map to a lowercase MD5 digest; two long literals with the same digest
    /// share a name.
    pub fn hash_string_by_content(&self, bytes: &[u8]) -> String {
        if bytes.len() <= self.options.literal_hash_threshold {
            hex::encode_upper(bytes)
        } else {
            hex::encode(Md5::digest(bytes))
        }
    }

    /// Get or create the read-only global holding `bytes`, returning its name.
    pub fn gen_literal(&self, module: &mut Module, bytes: &[u8]) -> CodegenResult<String> {
        let name = format!("{LITERAL_PREFIX}{}", self.hash_string_by_content(bytes));
        if !module.contains_symbol(&name) {
            module.push_global(name.clone(), bytes)?;
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration_names(module: &Module) -> Vec<&str> {
        module.declarations().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_table_sorted_and_bounded() {
        assert!(table_is_sorted());
        for record in intrinsic_table() {
            assert!(record.prerequisites.len() <= MAX_PREREQUISITES, "{}", record.name);
            for p in record.prerequisites {
                assert!(lookup_intrinsic(p).is_some(), "{} needs missing {p}", record.name);
            }
        }
    }

    #[test]
    fn test_table_is_acyclic() {
        fn visit<'a>(
            name: &'a str,
            visiting: &mut Vec<&'a str>,
            done: &mut std::collections::BTreeSet<&'a str>,
        ) {
            if done.contains(name) {
                return;
            }
            assert!(!visiting.contains(&name), "cycle through {visiting:?} -> {name}");
            visiting.push(name);
            for p in lookup_intrinsic(name).map_or(&[][..], |r| r.prerequisites) {
                visit(p, visiting, done);
            }
            visiting.pop();
            done.insert(name);
        }

        let mut done = std::collections::BTreeSet::new();
        for record in intrinsic_table() {
            visit(record.name, &mut Vec::new(), &mut done);
        }
        assert_eq!(done.len(), intrinsic_table().len());
    }

    #[test]
    fn test_prerequisites_load_first() {
        let lib = IntrinsicLibrary::default();
        let mut module = Module::new("m");
        lib.load_intrinsic(&mut module, "__quantum__qis__mz__body").unwrap();
        assert_eq!(
            declaration_names(&module),
            [
                "Qubit",
                "Result",
                "__quantum__rt__result_record_output",
                "__quantum__qis__mz__body"
            ]
        );
    }

    #[test]
    fn test_load_is_idempotent() {
        let lib = IntrinsicLibrary::default();
        let mut module = Module::new("m");
        lib.load_intrinsic(&mut module, "__skald_copy_bytes").unwrap();
        let once = module.clone();
        lib.load_intrinsic(&mut module, "__skald_copy_bytes").unwrap();
        lib.load_intrinsic(&mut module, "malloc").unwrap();
        assert_eq!(module, once);
        assert_eq!(
            declaration_names(&module),
            ["llvm.memcpy.p0i8.p0i8.i64", "malloc", "__skald_copy_bytes"]
        );
    }

    #[test]
    fn test_unknown_intrinsic() {
        let lib = IntrinsicLibrary::default();
        let mut module = Module::new("m");
        let err = lib.load_intrinsic(&mut module, "__quantum__qis__u3__body").unwrap_err();
        assert!(matches!(err, CodegenError::UnknownIntrinsic(_)));
        assert_eq!(module.symbols.len(), 0);
    }

    #[test]
    fn test_short_literal_is_hex() {
        let lib = IntrinsicLibrary::default();
        assert_eq!(lib.hash_string_by_content(b"r0"), "7230");
        assert_eq!(lib.hash_string_by_content(b"Hello"), "48656C6C6F");
    }

    #[test]
    fn test_long_literal_is_md5() {
        let lib = IntrinsicLibrary::default();
        let long = [b'a'; 33];
        let name = lib.hash_string_by_content(&long);
        assert_eq!(name.len(), 32);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let exactly = [b'a'; 32];
        assert_eq!(lib.hash_string_by_content(&exactly).len(), 64);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let lib = IntrinsicLibrary::new(CodegenOptions {
            literal_hash_threshold: 1,
        });
        assert_eq!(lib.hash_string_by_content(b"a"), "61");
        assert_eq!(lib.hash_string_by_content(b"ab"), "187ef4436122d1cc2f40dc2b92f0eba0");
    }

    #[test]
    fn test_gen_literal_reuses_symbol() {
        let lib = IntrinsicLibrary::default();
        let mut module = Module::new("m");
        let a = lib.gen_literal(&mut module, b"r0").unwrap();
        let b = lib.gen_literal(&mut module, b"r0").unwrap();
        assert_eq!(a, "cstr.7230");
        assert_eq!(a, b);
        assert_eq!(module.globals().count(), 1);
        assert_eq!(module.lookup_global(&a).unwrap().bytes, b"r0");
    }
}
