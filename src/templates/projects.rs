//! Project listing body (bridged).

/// Bridged list body over `flattenedProjects` with status, folder, and
/// name-substring filters.
pub fn list_body() -> &'static str {
    r#"const limit = params.limit || 100;
const needle = params.search ? params.search.toLowerCase() : null;
const statusName = function (p) {
  if (p.status === Project.Status.Active) { return "active"; }
  if (p.status === Project.Status.OnHold) { return "onHold"; }
  if (p.status === Project.Status.Done) { return "done"; }
  if (p.status === Project.Status.Dropped) { return "dropped"; }
  return "unknown";
};
const out = [];
for (const p of flattenedProjects) {
  if (out.length >= limit) { break; }
  if (params.status && statusName(p) !== params.status) { continue; }
  if (params.folderId) {
    const f = p.parentFolder;
    if (!f || f.id.primaryKey !== params.folderId) { continue; }
  }
  if (needle && p.name.toLowerCase().indexOf(needle) === -1) { continue; }
  out.push({
    id: p.id.primaryKey,
    name: p.name,
    note: p.note || "",
    status: statusName(p),
    folderId: p.parentFolder ? p.parentFolder.id.primaryKey : null,
    folderName: p.parentFolder ? p.parentFolder.name : null,
    sequential: p.sequential,
    completedByChildren: p.completedByChildren,
    dueDate: p.dueDate ? p.dueDate.toISOString() : null,
    deferDate: p.deferDate ? p.deferDate.toISOString() : null,
    taskCount: p.flattenedTasks.length,
    remainingCount: p.flattenedTasks.filter(function (t) { return !t.completed; }).length
  });
}
return JSON.stringify({ ok: true, data: out });"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projects_list_iterates_manually() {
        let body = list_body();
        assert!(body.contains("for (const p of flattenedProjects)"));
        assert!(!body.contains(".whose("));
    }

    #[test]
    fn test_projects_list_maps_status_names() {
        let body = list_body();
        for status in ["Active", "OnHold", "Done", "Dropped"] {
            assert!(body.contains(&format!("Project.Status.{status}")));
        }
    }

    #[test]
    fn test_projects_list_filters() {
        let body = list_body();
        assert!(body.contains("params.status"));
        assert!(body.contains("params.folderId"));
        assert!(body.contains("params.search"));
        assert!(body.contains("params.limit"));
    }
}
