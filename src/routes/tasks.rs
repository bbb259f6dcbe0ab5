use crate::{
    auth::Identity,
    error::AppError,
    models::{Task, TaskInput, TaskPatch, TaskQuery},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, user_id, created_at, updated_at";

/// Loads a task and confirms the caller owns it before any mutation.
///
/// A missing task and an ownership mismatch both fail with the same
/// `Forbidden`, so task ids cannot be enumerated by unauthorized callers.
async fn authorize_task(pool: &PgPool, identity: &Identity, task_id: Uuid) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = $1",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .fetch_optional(pool)
    .await?;

    match task {
        Some(task) if task.user_id == identity.id => Ok(task),
        _ => Err(AppError::Forbidden),
    }
}

/// Retrieves the task list for the authenticated user, newest first.
///
/// ## Query Parameters:
/// - `status` (optional): Filters tasks by board column (e.g., "TODO", "IN_PROGRESS", "DONE").
/// - `search` (optional): A string to search for in task titles and descriptions (case-insensitive).
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Task` objects.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    query_params: web::Query<TaskQuery>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    // Base query selects tasks for the authenticated owner; filter conditions
    // are appended dynamically with sequential bind placeholders.
    let mut sql = format!("SELECT {} FROM tasks WHERE user_id = $1", TASK_COLUMNS);
    let mut param_count = 2;

    if query_params.status.is_some() {
        sql.push_str(&format!(" AND status = ${}", param_count));
        param_count += 1;
    }
    if query_params.search.is_some() {
        sql.push_str(&format!(
            " AND (title ILIKE ${} OR description ILIKE ${})",
            param_count,
            param_count + 1
        ));
    }

    sql.push_str(" ORDER BY created_at DESC");

    let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(identity.id);

    if let Some(status) = &query_params.status {
        query_builder = query_builder.bind(status);
    }
    if let Some(search) = &query_params.search {
        let search_pattern = format!("%{}%", search);
        query_builder = query_builder.bind(search_pattern.clone());
        query_builder = query_builder.bind(search_pattern);
    }

    let tasks = query_builder.fetch_all(&**pool).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// A JSON object matching `TaskInput`:
/// - `title`: The title of the task (required, 1-200 characters).
/// - `description` (optional): A description of the task.
/// - `status`: The board column (e.g., "TODO", "IN_PROGRESS", "DONE").
/// - `priority` (optional): "low", "medium", or "high".
/// - `dueDate` (optional): The due date for the task.
///
/// ## Responses:
/// - `201 Created`: Returns the newly created `Task` object as JSON.
/// - `400 Bad Request`: If input validation fails or the status is not one of the enumeration.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), identity.id);

    let result = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (id, title, description, status, priority, due_date, user_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task.id)
    .bind(task.title)
    .bind(task.description)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.due_date)
    .bind(task.user_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(result))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: Returns the `Task` object as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the task does not exist or is not owned by the caller.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let task = authorize_task(&pool, &identity, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Applies a partial update to a task the caller owns.
///
/// Only the supplied fields are touched: for nullable fields an explicit
/// `null` clears the column while an absent field leaves it as-is, and
/// `assignee: {id}` reassigns the task to a different owning user.
/// An empty body returns the task unchanged.
///
/// ## Request Body:
/// Any subset of `{title, description, status, dueDate, priority, assignee: {id}}`.
///
/// ## Responses:
/// - `200 OK`: Returns the updated `Task` object as JSON.
/// - `400 Bad Request`: If a supplied field fails validation.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the task does not exist or is not owned by the caller.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    patch: web::Json<TaskPatch>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let patch = patch.into_inner();
    patch.validate()?;

    let task_uuid = task_id.into_inner();
    let current = authorize_task(&pool, &identity, task_uuid).await?;

    if patch.is_empty() {
        return Ok(HttpResponse::Ok().json(current));
    }

    // Dynamic SET clause mirroring the dynamic WHERE used in get_tasks:
    // one placeholder per supplied field, bound in the same order below.
    let mut sets: Vec<String> = Vec::new();
    let mut param_count = 1;

    if patch.title.is_some() {
        sets.push(format!("title = ${}", param_count));
        param_count += 1;
    }
    if patch.description.is_some() {
        sets.push(format!("description = ${}", param_count));
        param_count += 1;
    }
    if patch.status.is_some() {
        sets.push(format!("status = ${}", param_count));
        param_count += 1;
    }
    if patch.priority.is_some() {
        sets.push(format!("priority = ${}", param_count));
        param_count += 1;
    }
    if patch.due_date.is_some() {
        sets.push(format!("due_date = ${}", param_count));
        param_count += 1;
    }
    if patch.assignee.is_some() {
        sets.push(format!("user_id = ${}", param_count));
        param_count += 1;
    }
    sets.push("updated_at = NOW()".to_string());

    let sql = format!(
        "UPDATE tasks SET {} WHERE id = ${} AND user_id = ${} RETURNING {}",
        sets.join(", "),
        param_count,
        param_count + 1,
        TASK_COLUMNS
    );

    let mut query_builder = sqlx::query_as::<_, Task>(&sql);

    if let Some(title) = &patch.title {
        query_builder = query_builder.bind(title);
    }
    if let Some(description) = &patch.description {
        query_builder = query_builder.bind(description.clone());
    }
    if let Some(status) = patch.status {
        query_builder = query_builder.bind(status);
    }
    if let Some(priority) = patch.priority {
        query_builder = query_builder.bind(priority);
    }
    if let Some(due_date) = patch.due_date {
        query_builder = query_builder.bind(due_date);
    }
    if let Some(assignee) = patch.assignee {
        query_builder = query_builder.bind(assignee.id);
    }

    let updated = query_builder
        .bind(task_uuid)
        .bind(identity.id)
        .fetch_optional(&**pool)
        .await?;

    // The row can vanish between the ownership check and the update; the
    // caller sees the same masked failure either way.
    let updated = updated.ok_or(AppError::Forbidden)?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task the caller owns.
///
/// ## Responses:
/// - `200 OK`: `{message}` acknowledgment on successful deletion.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the task does not exist or is not owned by the caller.
/// - `404 Not Found`: If the row disappeared between the ownership check and the delete.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let task_uuid = task_id.into_inner();
    authorize_task(&pool, &identity, task_uuid).await?;

    // Filter by both id and owner so a concurrent reassignment cannot turn
    // this into deleting someone else's task.
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_uuid)
        .bind(identity.id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
