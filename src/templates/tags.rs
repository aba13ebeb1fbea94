//! Tag listing body (bridged).

/// Bridged list body over `flattenedTags` with hierarchy info and
/// remaining/available counts.
pub fn list_body() -> &'static str {
    r#"const limit = params.limit || 200;
const needle = params.search ? params.search.toLowerCase() : null;
const out = [];
for (const t of flattenedTags) {
  if (out.length >= limit) { break; }
  if (needle && t.name.toLowerCase().indexOf(needle) === -1) { continue; }
  if (params.parentId) {
    const parent = t.parent;
    if (!parent || parent.id.primaryKey !== params.parentId) { continue; }
  }
  out.push({
    id: t.id.primaryKey,
    name: t.name,
    parentId: t.parent ? t.parent.id.primaryKey : null,
    parentName: t.parent ? t.parent.name : null,
    active: t.active,
    allowsNextAction: t.allowsNextAction,
    availableCount: t.availableTasks.length,
    remainingCount: t.remainingTasks.length,
    childCount: t.children.length
  });
}
return JSON.stringify({ ok: true, data: out });"#
}
