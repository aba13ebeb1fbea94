//! Folder listing body (bridged).

/// Bridged list body over `flattenedFolders`.
pub fn list_body() -> &'static str {
    r#"const limit = params.limit || 200;
const needle = params.search ? params.search.toLowerCase() : null;
const out = [];
for (const f of flattenedFolders) {
  if (out.length >= limit) { break; }
  if (needle && f.name.toLowerCase().indexOf(needle) === -1) { continue; }
  out.push({
    id: f.id.primaryKey,
    name: f.name,
    parentId: f.parent ? f.parent.id.primaryKey : null,
    parentName: f.parent ? f.parent.name : null,
    active: f.status === Folder.Status.Active,
    projectCount: f.projects.length,
    folderCount: f.folders.length
  });
}
return JSON.stringify({ ok: true, data: out });"#
}
