//! Document commands - upload, list, inspect, delete
//!
//! Uploads only confirm that the backend accepted the file; the OCR
//! pipeline runs asynchronously and its progress shows up as the
//! document status on subsequent listings.

use anyhow::Result;
use std::path::Path;

use crate::api::DocumentClient;

pub async fn upload(documents: &DocumentClient, file: &Path, chat: Option<String>) -> Result<()> {
    match documents.upload(file, chat.as_deref()).await {
        Ok(document) => {
            println!("\x1b[1;32m✅ Uploaded {}\x1b[0m", document.original_name);
            println!(
                "\x1b[90m{} bytes, {} - status: {}\x1b[0m",
                document.file_size, document.mime_type, document.status
            );
            println!("Document ID: {}", document.id);
            Ok(())
        }
        Err(err) => {
            eprintln!("\x1b[31m❌ Upload failed: {err}\x1b[0m");
            Err(err.into())
        }
    }
}

pub async fn list(documents: &DocumentClient) -> Result<()> {
    let all = documents.list().await?;
    if all.is_empty() {
        println!("No documents uploaded yet.");
        return Ok(());
    }

    for document in all {
        let chat = document
            .chat_id
            .as_deref()
            .map(|id| format!("  chat:{id}"))
            .unwrap_or_default();
        println!(
            "{}  {:<12} {}{}",
            document.id,
            document.status.as_str(),
            document.original_name,
            chat
        );
    }
    Ok(())
}

pub async fn show(documents: &DocumentClient, id: &str) -> Result<()> {
    let document = documents.get(id).await?;

    println!("Name:     {}", document.original_name);
    println!("Size:     {} bytes", document.file_size);
    println!("Type:     {}", document.mime_type);
    println!("Status:   {}", document.status);
    println!("Uploaded: {}", document.created_at.to_rfc3339());
    if let Some(chat_id) = &document.chat_id {
        println!("Chat:     {chat_id}");
    }
    if let Some(error) = &document.error_message {
        println!("\x1b[31mError:    {error}\x1b[0m");
    }
    if let Some(text) = &document.extracted_text {
        println!();
        println!("{text}");
    }
    Ok(())
}

pub async fn delete(documents: &DocumentClient, id: &str) -> Result<()> {
    documents.delete(id).await?;
    println!("\x1b[32m✅ Document deleted\x1b[0m");
    Ok(())
}
