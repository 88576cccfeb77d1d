//! End-to-end editing scenarios: keyboard flows on the state machine and the
//! workspace saving through an in-memory repository.

use std::sync::Arc;
use std::time::Duration;

use folio_db::MemNoteRepository;
use folio_editor::{
    BlockPatch, BlockType, Editor, Key, KeyInput, NoteRepository, Workspace,
};

#[test]
fn test_paragraph_enter_then_backspace_round_trip() {
    let mut editor = Editor::new();

    let first = editor.insert_block(BlockType::Paragraph, None);
    assert_eq!(editor.blocks().len(), 1);
    assert_eq!(editor.blocks()[0].block_type, BlockType::Paragraph);
    assert_eq!(editor.blocks()[0].content, "");

    editor.update_block_content(&first, BlockPatch::content("Hello"));
    assert!(editor.handle_key(&first, &KeyInput::new(Key::Enter)));
    assert_eq!(editor.blocks().len(), 2);
    let second = editor.blocks()[1].id.clone();
    assert_eq!(editor.blocks()[1].block_type, BlockType::Paragraph);
    assert_eq!(editor.take_focus(), Some(second.clone()));

    assert!(editor.handle_key(&second, &KeyInput::new(Key::Backspace)));
    assert_eq!(editor.blocks().len(), 1);
    assert_eq!(editor.blocks()[0].id, first);
    assert_eq!(editor.take_focus(), Some(first));
}

#[test]
fn test_bullet_enter_continues_list() {
    let mut editor = Editor::new();
    let bullet = editor.insert_block(BlockType::BulletList, None);
    editor.update_block_content(&bullet, BlockPatch::content("milk"));

    assert!(editor.handle_key(&bullet, &KeyInput::new(Key::Enter)));

    assert_eq!(editor.blocks().len(), 2);
    assert_eq!(editor.blocks()[0].block_type, BlockType::BulletList);
    assert_eq!(editor.blocks()[0].content, "milk");
    assert_eq!(editor.blocks()[1].block_type, BlockType::BulletList);
}

#[test]
fn test_convert_to_checkbox_then_toggle() {
    let mut editor = Editor::new();
    let id = editor.insert_block(BlockType::BulletList, None);

    assert!(editor.convert_block(&id, BlockType::CheckboxList));
    assert!(editor.toggle_checked(&id));

    let block = editor.block(&id).unwrap();
    assert_eq!(block.block_type, BlockType::CheckboxList);
    assert_eq!(block.content, "");
    assert!(block.is_checked());
}

#[test]
fn test_slash_menu_flow() {
    let mut editor = Editor::new();
    let id = editor.insert_block(BlockType::Paragraph, None);

    assert!(editor.handle_key(&id, &KeyInput::new(Key::Slash)));
    assert!(editor.command_menu().is_some());
    assert!(editor.select_command(BlockType::NumberedList));

    assert_eq!(editor.blocks()[0].block_type, BlockType::NumberedList);
    assert_eq!(folio_editor::list_numbers(editor.blocks()), vec![Some(1)]);
}

#[tokio::test(start_paused = true)]
async fn test_workspace_autosaves_after_quiet_period() {
    let repo = Arc::new(MemNoteRepository::new());
    let mut workspace = Workspace::new(repo.clone());

    let id = workspace.create_note().await.unwrap();
    assert_eq!(workspace.selected_id(), Some(id));
    assert_eq!(workspace.list().len(), 1);
    assert_eq!(workspace.take_notifications()[0].title, "Note created");

    let first = workspace.editor().unwrap().blocks()[0].id.clone();
    workspace.edit(|editor| editor.set_title("Groceries"));
    tokio::time::sleep(Duration::from_millis(500)).await;
    workspace.edit(|editor| editor.update_block_content(&first, BlockPatch::content("eggs")));

    // Quiet period not over yet.
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(repo.get(id).await.unwrap().title, "Untitled Note");

    tokio::time::sleep(Duration::from_secs(2)).await;
    let stored = repo.get(id).await.unwrap();
    assert_eq!(stored.title, "Groceries");
    assert_eq!(stored.blocks[0].content, "eggs");

    assert_eq!(workspace.apply_save_events(), 1);
    assert_eq!(workspace.list().get(id).unwrap().title, "Groceries");
    assert_eq!(workspace.list().get(id).unwrap().preview, "eggs");
    assert!(!workspace.editor().unwrap().is_dirty());
}

#[tokio::test(start_paused = true)]
async fn test_workspace_never_saves_blank_note() {
    let repo = Arc::new(MemNoteRepository::new());
    let mut workspace = Workspace::new(repo.clone());
    let id = workspace.create_note().await.unwrap();

    workspace.edit(|editor| editor.set_title(""));
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(repo.get(id).await.unwrap().title, "Untitled Note");
    assert_eq!(workspace.apply_save_events(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_closing_discards_pending_save() {
    let repo = Arc::new(MemNoteRepository::new());
    let mut workspace = Workspace::new(repo.clone());
    let id = workspace.create_note().await.unwrap();

    workspace.edit(|editor| editor.set_title("never saved"));
    workspace.close();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(repo.get(id).await.unwrap().title, "Untitled Note");
    assert!(workspace.editor().is_none());
    assert!(workspace.edit(|editor| editor.set_title("x")).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_search_delete_and_reopen() {
    let repo = Arc::new(MemNoteRepository::with_welcome_note());
    let mut workspace = Workspace::new(repo.clone());

    workspace.refresh().await.unwrap();
    assert_eq!(workspace.list().len(), 1);

    let id = workspace.create_note().await.unwrap();
    workspace.search("welcome").await.unwrap();
    assert_eq!(workspace.list().len(), 1);
    assert_eq!(workspace.list().items()[0].id, 1);

    workspace.search("  ").await.unwrap();
    assert_eq!(workspace.list().len(), 2);

    workspace.delete(id).await.unwrap();
    assert!(workspace.editor().is_none());
    assert_eq!(workspace.list().len(), 1);

    assert!(workspace.delete(id).await.is_err());
    assert!(workspace.take_notifications().iter().any(|n| n.destructive));

    workspace.open(1).await.unwrap();
    assert_eq!(workspace.editor().unwrap().blocks().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_create_while_searching_keeps_list_filtered() {
    let repo = Arc::new(MemNoteRepository::with_welcome_note());
    let mut workspace = Workspace::new(repo.clone());

    workspace.search("welcome").await.unwrap();
    assert_eq!(workspace.list().len(), 1);

    let id = workspace.create_note().await.unwrap();
    assert_eq!(workspace.list().len(), 1);
    assert!(workspace.list().get(id).is_none());
    assert_eq!(workspace.editor().unwrap().blocks().len(), 1);

    workspace.search("").await.unwrap();
    assert!(workspace.list().get(id).is_some());
}

#[tokio::test(start_paused = true)]
async fn test_opening_missing_note_notifies() {
    let repo = Arc::new(MemNoteRepository::new());
    let mut workspace = Workspace::new(repo);

    assert!(workspace.open(999).await.is_err());
    assert!(workspace.editor().is_none());

    let notifications = workspace.take_notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].destructive);
}
