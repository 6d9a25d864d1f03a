//! Constants shared across the crate.

/// Project configuration file, looked up at the project root.
pub const CONFIG_FILENAME: &str = "nsbuild.toml";

/// Implementation source extension (without the dot).
pub const IMPL_EXT: &str = "ml";

/// Interface source extension (without the dot).
pub const INTF_EXT: &str = "mli";

/// Separator placed between path components of a flattened module name.
pub const NAMESPACE_SEPARATOR: &str = "__";

/// Suffix appended to a dependency artifact (`foo.ml` -> `foo.ml.depends`).
pub const DEPENDS_SUFFIX: &str = ".depends";

/// Extension of the digest stamp of a namespace.
pub const STAMP_EXT: &str = "stamp";

/// Suffix of the alias aggregate module of a namespace (before `.ml`).
pub const ALIASES_SUFFIX: &str = "___aliases";

/// Extension of a library manifest.
pub const MANIFEST_EXT: &str = "mllib";

/// Bytecode (dynamically linked) executable extension.
pub const BYTE_EXT: &str = "byte";

/// Native (statically linked) executable extension.
pub const NATIVE_EXT: &str = "native";

/// Opening and closing markers of a synthetic failure target.
///
/// No rule product pattern ends in `>>`, so a synthetic key can never be built.
pub const FAILURE_KEY_OPEN: &str = "<<nsbuild:inapplicable:";
pub const FAILURE_KEY_CLOSE: &str = ">>";

/// Replaces whitespace inside the message part of a synthetic failure key.
pub const FAILURE_KEY_FILLER: char = '_';

/// Reason signaled by the executable tagging rule once its tags are attached.
pub const EXECUTABLE_TAGGED: &str = "executable libraries tagged";

pub const DEFAULT_BUILD_DIR: &str = "_build";
pub const DEFAULT_BUILD_LOG: &str = "_log";
pub const DEFAULT_ANALYZER: &str = "ocamldep";
pub const DEFAULT_SOURCE_DIR: &str = "src";
pub const DEFAULT_COMPILERS: &[&str] = &["ocamlc", "ocamlopt", "ocamlc.opt", "ocamlopt.opt"];
