//! Instruction text builders for the three surface-finish calls.
//!
//! The underlying capability is a general-purpose image editor, so the
//! prompt text is the only lever preventing structural drift between
//! stages. Invariant clauses always precede mutable instructions, and a
//! user instruction never outranks them.

/// Structural invariants for the finish stage, stated before anything
/// mutable.
pub const FINISH_INVARIANTS: &str = "NEVER remove or move walls, load-bearing walls, columns, stairs, \
     railings, or openings. NEVER convert windows into doors. NEVER add \
     doors to solid walls. Keep every structural element exactly where it is; \
     the room geometry must remain identical.";

/// Structure-preserving invariant for refinement calls.
pub const REFINEMENT_INVARIANTS: &str = "Do not change the room structure, walls, windows, or flooring.";

/// Builds the instruction for the surface-finish stage.
///
/// A user instruction, when present, is appended as an explicitly
/// subordinate clause; when absent no trailing block is added.
#[must_use]
pub fn finish_prompt(room_hint: &str, user_instruction: Option<&str>) -> String {
    let mut prompt = format!(
        "Prepare this {room_hint} photo for virtual staging. {FINISH_INVARIANTS} \
         Then finish the surfaces: paint any raw or unfinished ceiling and \
         walls white. Replace raw subfloor or screed with light oak parquet. \
         Remove loose debris, tools, buckets, and construction leftovers. \
         Add one ceiling light fixture if none is present. Cover exposed \
         electrical junction boxes with finished outlets or switches."
    );

    if let Some(extra) = user_instruction.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str(" Additionally, where it does not conflict with any rule above: ");
        prompt.push_str(extra);
    }

    prompt
}

/// Builds the instruction for the polish stage.
///
/// Narrowly scoped: only floor-leaning artwork and missing ceiling
/// fixtures are corrected; everything else is explicitly off limits.
#[must_use]
pub fn polish_prompt(room_hint: &str) -> String {
    format!(
        "Fix staging artifacts in this {room_hint} photo. If any artwork or \
         framed picture leans against a wall at floor level, hang it on that \
         wall at eye level. If the ceiling has no light fixture, add one. \
         Make NO other change: keep the layout, furniture, walls, windows, \
         and flooring exactly as they are."
    )
}

/// Builds the instruction for a refinement call.
#[must_use]
pub fn refinement_prompt(user_correction: &str) -> String {
    format!("{REFINEMENT_INVARIANTS} Apply only this correction and nothing else: {user_correction}")
}
