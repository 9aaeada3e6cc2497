/*!
 * # Bullet Isolation
 *
 * Lifts a bullet subtree out of a document into a standalone side document
 * and later splices the edited result back into the exact range it came from.
 *
 * ## Pipeline
 *
 * 1. **`locator`**: finds the subtree boundary from indentation alone and
 *    normalizes its lines to depth 0
 * 2. **`codec`**: writes the subtree plus a `Provenance` record into the side
 *    document text, and reads it back
 * 3. **`splice`**: replaces the recorded range of the origin document with the
 *    edited lines, whatever their count
 * 4. **`session`**: sequences the above against a `DocumentStore` and guards
 *    write-back with a latch
 *
 * The first three stages are pure functions over line arrays. Only the
 * session touches storage.
 *
 * ## Side Document Format
 *
 * ```text
 * ---
 * origin: journal/today.md
 * startLine: 4
 * endLine: 7
 * offset: 1
 * ---
 * - Root item
 * 	- Child item
 * ```
 *
 * ## Usage Pattern
 *
 * ```rust
 * use bullet_isolator_engine::isolation::*;
 * use bullet_isolator_engine::outline::ListSyntax;
 *
 * let syntax = ListSyntax::default();
 * let origin = ["x", "- A", "\t- B", "y"];
 *
 * let subtree = locate(&origin, 1, &syntax).unwrap();
 * let text = encode(&subtree.body_lines, &subtree.provenance("notes.md"));
 *
 * // ... the side document is edited ...
 * let edited = format!("{text}\n\t- C");
 *
 * let side = decode(&edited).unwrap();
 * let lines = splice_back(&origin, &side.provenance, &side.body_lines, syntax.indent).unwrap();
 * assert_eq!(lines, ["x", "- A", "\t- B", "\t- C", "y"]);
 * ```
 */

pub mod codec;
pub mod locator;
pub mod session;
pub mod splice;

pub use codec::{CodecError, DELIMITER, Provenance, SideDocument, decode, encode};
pub use locator::{LocateError, Subtree, apply_depth, locate, strip_depth};
pub use session::{IsolateError, Isolator, WriteBack, WriteBackReport, WriteBackState};
pub use splice::{SpliceError, splice_back};
