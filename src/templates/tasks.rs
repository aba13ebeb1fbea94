//! Task operation bodies — list, create, update, complete, delete.
//!
//! Listing, completion, and deletion run as Omni Automation (the bridged
//! dialect): direct property access, `Task.byIdentifier` O(1) lookup, no
//! per-property Apple Events round trips. Creation must go through JXA
//! because only the direct dialect has a usable `app.Task({...})`
//! constructor; tags and the planned date cannot be set reliably from JXA
//! and are fixed up through a nested bridge call keyed by the new task's id.
//!
//! No body may contain the `.whose(` specifier — it degrades to a full
//! Apple Events scan per property and takes 20+ seconds on large documents.

/// Bridged list body. Manual iteration over `flattenedTasks`; every filter
/// is optional and absent filters cost nothing.
pub fn list_body() -> &'static str {
    r#"const limit = params.limit || 100;
const needle = params.search ? params.search.toLowerCase() : null;
const dueBefore = params.dueBefore ? new Date(params.dueBefore) : null;
const dueAfter = params.dueAfter ? new Date(params.dueAfter) : null;
const out = [];
for (const t of flattenedTasks) {
  if (out.length >= limit) { break; }
  if (params.completed !== undefined && t.completed !== params.completed) { continue; }
  if (params.flagged !== undefined && t.flagged !== params.flagged) { continue; }
  if (params.projectId) {
    const p = t.containingProject;
    if (!p || p.id.primaryKey !== params.projectId) { continue; }
  }
  if (params.tagId) {
    let tagged = false;
    for (const tag of t.tags) {
      if (tag.id.primaryKey === params.tagId) { tagged = true; break; }
    }
    if (!tagged) { continue; }
  }
  if (params.inInbox !== undefined && t.inInbox !== params.inInbox) { continue; }
  if (params.available) {
    const s = t.taskStatus;
    if (s !== Task.Status.Available && s !== Task.Status.DueSoon && s !== Task.Status.Overdue) { continue; }
  }
  if (needle && t.name.toLowerCase().indexOf(needle) === -1) { continue; }
  if (dueBefore && (!t.dueDate || t.dueDate >= dueBefore)) { continue; }
  if (dueAfter && (!t.dueDate || t.dueDate <= dueAfter)) { continue; }
  out.push({
    id: t.id.primaryKey,
    name: t.name,
    note: t.note || "",
    completed: t.completed,
    flagged: t.flagged,
    dueDate: t.dueDate ? t.dueDate.toISOString() : null,
    deferDate: t.deferDate ? t.deferDate.toISOString() : null,
    plannedDate: t.plannedDate ? t.plannedDate.toISOString() : null,
    estimatedMinutes: t.estimatedMinutes,
    inInbox: t.inInbox,
    projectId: t.containingProject ? t.containingProject.id.primaryKey : null,
    projectName: t.containingProject ? t.containingProject.name : null,
    tags: t.tags.map(function (tag) { return tag.name; })
  });
}
if (params.sortBy === "dueDate") {
  out.sort(function (a, b) {
    if (!a.dueDate) { return b.dueDate ? 1 : 0; }
    if (!b.dueDate) { return -1; }
    return a.dueDate < b.dueDate ? -1 : (a.dueDate > b.dueDate ? 1 : 0);
  });
} else if (params.sortBy === "name") {
  out.sort(function (a, b) { return a.name.localeCompare(b.name); });
}
return JSON.stringify({ ok: true, data: out });"#
}

const CREATE_HEAD: &str = r#"const props = { name: params.name };
if (params.note !== undefined) { props.note = params.note; }
if (params.flagged !== undefined) { props.flagged = params.flagged; }
if (params.dueDate) { props.dueDate = new Date(params.dueDate); }
if (params.deferDate) { props.deferDate = new Date(params.deferDate); }
if (params.estimatedMinutes !== undefined) { props.estimatedMinutes = params.estimatedMinutes; }
const task = app.Task(props);
if (params.projectId) {
  const project = doc.flattenedProjects.byId(params.projectId);
  try {
    project.id();
  } catch (probe) {
    return JSON.stringify({ error: true, message: "Project not found: " + params.projectId });
  }
  project.tasks.push(task);
} else {
  doc.inboxTasks.push(task);
}
const taskId = task.id();"#;

const CREATE_TAIL: &str =
    r#"return JSON.stringify({ success: true, data: { id: taskId, name: params.name } });"#;

/// Direct create body. `bridge` is the fix-up section the synthesizer
/// composes for the hybrid strategy; `None` for plain direct creation.
pub fn create_body(bridge: Option<&str>) -> String {
    let mut body = String::from(CREATE_HEAD);
    body.push('\n');
    if let Some(section) = bridge {
        body.push_str(section);
        body.push('\n');
    }
    body.push_str(CREATE_TAIL);
    body
}

/// Runtime payload for the create fix-up bridge call. Keyed by the created
/// task's identifier, never by re-serializing the outer payload.
pub const CREATE_FIXUP_PARAMS_EXPR: &str =
    "{ id: taskId, tags: params.tags || [], plannedDate: params.plannedDate || null }";

/// Bridged fix-up body: assign tags (creating missing ones) and the planned
/// date on a freshly created task.
pub fn create_fixup_body() -> &'static str {
    r#"const task = Task.byIdentifier(params.id);
if (!task) {
  return JSON.stringify({ error: true, message: "Created task vanished before fix-up: " + params.id });
}
for (const name of params.tags) {
  let tag = null;
  for (const candidate of flattenedTags) {
    if (candidate.name === name) { tag = candidate; break; }
  }
  if (!tag) { tag = new Tag(name); }
  task.addTag(tag);
}
if (params.plannedDate) {
  task.plannedDate = new Date(params.plannedDate);
}
return JSON.stringify({ applied: true });"#
}

/// Direct update body for scalar-only changes.
pub fn update_direct_body() -> &'static str {
    r#"const task = doc.flattenedTasks.byId(params.id);
try {
  task.id();
} catch (probe) {
  return JSON.stringify({ error: true, message: "Task not found: " + params.id });
}
if (params.name !== undefined) { task.name = params.name; }
if (params.note !== undefined) { task.note = params.note; }
if (params.flagged !== undefined) { task.flagged = params.flagged; }
if (params.dueDate !== undefined) { task.dueDate = params.dueDate ? new Date(params.dueDate) : null; }
if (params.deferDate !== undefined) { task.deferDate = params.deferDate ? new Date(params.deferDate) : null; }
if (params.estimatedMinutes !== undefined) { task.estimatedMinutes = params.estimatedMinutes; }
return JSON.stringify({ success: true, data: { id: params.id, updated: true } });"#
}

/// Bridged update body: scalars plus tag replace/add/remove, planned date,
/// and recurrence — the fields JXA cannot set reliably.
pub fn update_bridged_body() -> &'static str {
    r#"const task = Task.byIdentifier(params.id);
if (!task) {
  return JSON.stringify({ error: true, message: "Task not found: " + params.id });
}
if (params.name !== undefined) { task.name = params.name; }
if (params.note !== undefined) { task.note = params.note; }
if (params.flagged !== undefined) { task.flagged = params.flagged; }
if (params.dueDate !== undefined) { task.dueDate = params.dueDate ? new Date(params.dueDate) : null; }
if (params.deferDate !== undefined) { task.deferDate = params.deferDate ? new Date(params.deferDate) : null; }
if (params.estimatedMinutes !== undefined) { task.estimatedMinutes = params.estimatedMinutes; }
if (params.plannedDate !== undefined) { task.plannedDate = params.plannedDate ? new Date(params.plannedDate) : null; }
const findTag = function (name) {
  for (const candidate of flattenedTags) {
    if (candidate.name === name) { return candidate; }
  }
  return null;
};
if (params.tags !== undefined) {
  task.removeTags(task.tags);
  for (const name of params.tags) {
    task.addTag(findTag(name) || new Tag(name));
  }
}
if (params.addTags) {
  for (const name of params.addTags) {
    task.addTag(findTag(name) || new Tag(name));
  }
}
if (params.removeTags) {
  for (const name of params.removeTags) {
    const tag = findTag(name);
    if (tag) { task.removeTag(tag); }
  }
}
if (params.repetitionRule !== undefined) {
  if (params.repetitionRule) {
    const method = Task.RepetitionMethod[params.repetitionRule.method] || Task.RepetitionMethod.Fixed;
    task.repetitionRule = new Task.RepetitionRule(params.repetitionRule.rule, method);
  } else {
    task.repetitionRule = null;
  }
}
return JSON.stringify({ success: true, data: { id: params.id, updated: true } });"#
}

/// Bridged completion body. Identifier-keyed lookup; the id is already
/// known, so no collection scan happens.
pub fn complete_body() -> &'static str {
    r#"const task = Task.byIdentifier(params.id);
if (!task) {
  return JSON.stringify({ error: true, message: "Task not found: " + params.id });
}
task.markComplete();
return JSON.stringify({ id: task.id.primaryKey, name: task.name, completed: true });"#
}

/// Bridged deletion body.
pub fn delete_body() -> &'static str {
    r#"const task = Task.byIdentifier(params.id);
if (!task) {
  return JSON.stringify({ error: true, message: "Task not found: " + params.id });
}
const name = task.name;
deleteObject(task);
return JSON.stringify({ id: params.id, name: name, deleted: true });"#
}
