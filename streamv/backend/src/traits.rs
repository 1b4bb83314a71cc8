use streamv_frontend::SchemaRef;
use streamv_utils::{Id, StreamvResult, Value};

/// Fixed opcode vocabulary a consuming engine must understand. Translation
/// only ever emits these; anything else reaching an engine is an
/// integration error on the consumer side.
pub const BACKEND_OPCODES: [&str; 12] = [
    "source",
    "const",
    "lt",
    "gt",
    "sub",
    "index",
    "last",
    "every",
    "always",
    "multiplex",
    "global_time",
    "external",
];

/// Node factories supplied by an execution engine.
///
/// `Backend::name` identifies the engine in integration errors.
/// `Backend::make_constant` and `Backend::make_call` build engine-native
/// nodes; the translator never inspects the nodes it is handed back. A
/// factory that does not support an opcode must return
/// [`streamv_utils::Error::BackendIntegration`], never substitute a
/// default.
pub trait Backend {
    /// Opaque node handle produced by the engine.
    type Node;

    fn name(&self) -> &'static str;

    fn make_constant(&mut self, value: &Value) -> StreamvResult<Self::Node>;

    fn make_call(
        &mut self,
        opcode: &str,
        args: Vec<Self::Node>,
    ) -> StreamvResult<Self::Node>;
}

/// Maps a referenced (schema, field) pair to an engine-native source node.
pub trait ResolveSource {
    type Node;

    fn resolve(
        &self,
        schema: &SchemaRef,
        field: &Id,
    ) -> StreamvResult<Self::Node>;
}
