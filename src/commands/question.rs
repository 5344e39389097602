use tracing::info;

use crate::error::Result;
use crate::model::{Question, QuestionEdit};
use crate::session::Session;
use crate::store::KeyValueStore;

/// Appends a question, optionally overriding its default fields.
/// Returns its display number and contents.
pub fn add<S: KeyValueStore + ?Sized>(store: &S, edit: QuestionEdit) -> Result<(usize, Question)> {
    let mut session = Session::load(store);
    let id = session.outline.add_question()?.id.clone();
    if !edit.is_empty() {
        session.outline.edit_question(&id, edit)?;
    }
    session.save(store)?;

    let number = session.outline.len();
    info!(question = number, id = %id, "added question");
    Ok((number, session.outline.questions()[number - 1].clone()))
}

/// Changes the question shown as `number`.
pub fn edit<S: KeyValueStore + ?Sized>(
    store: &S,
    number: usize,
    edit: QuestionEdit,
) -> Result<Question> {
    let mut session = Session::load(store);
    let id = session.outline.id_at(number)?.to_string();
    let question = session.outline.edit_question(&id, edit)?.clone();
    session.save(store)?;

    info!(question = number, "edited question");
    Ok(question)
}

/// Removes the question shown as `number`; later questions move up.
pub fn remove<S: KeyValueStore + ?Sized>(store: &S, number: usize) -> Result<Question> {
    let mut session = Session::load(store);
    let id = session.outline.id_at(number)?.to_string();
    let removed = session.outline.remove_question(&id)?;
    session.save(store)?;

    info!(question = number, id = %removed.id, "removed question");
    Ok(removed)
}

/// Replaces every question with a single default one.
pub fn clear<S: KeyValueStore + ?Sized>(store: &S) -> Result<()> {
    let mut session = Session::load(store);
    session.outline.clear();
    session.save(store)?;

    info!("cleared questions");
    Ok(())
}
