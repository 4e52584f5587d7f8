// Copyright (c) 2020 Rafael Alcaraz Mercado. All rights reserved.
// Licensed under the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>.
// All files in the project carrying such notice may not be copied, modified, or distributed
// except according to those terms.
// THE SOURCE CODE IS AVAILABLE UNDER THE ABOVE CHOSEN LICENSE "AS IS", WITH NO WARRANTIES.

//! Identity of every Harbor API operation the client sends. Failed responses
//! carry their operation so error translators can tell a 409 on create apart
//! from a 409 anywhere else.

macro_rules! operations {
    ($($variant:ident => $id:literal,)*) => {
        /// Harbor API operation, named after its swagger `operationId`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operation {
            $($variant,)*
        }

        impl Operation {
            /// Returns the swagger `operationId` of the operation.
            pub const fn id(self) -> &'static str {
                match self {
                    $(Operation::$variant => $id,)*
                }
            }
        }
    };
}

operations! {
    // project
    CreateProject => "createProject",
    GetProject => "getProject",
    ListProjects => "listProjects",
    HeadProject => "headProject",
    UpdateProject => "updateProject",
    DeleteProject => "deleteProject",
    AddProjectMetadatas => "addProjectMetadatas",
    GetProjectMetadata => "getProjectMetadata",
    ListProjectMetadatas => "listProjectMetadatas",
    UpdateProjectMetadata => "updateProjectMetadata",
    DeleteProjectMetadata => "deleteProjectMetadata",
    CreateProjectMember => "createProjectMember",
    ListProjectMembers => "listProjectMembers",
    UpdateProjectMember => "updateProjectMember",
    DeleteProjectMember => "deleteProjectMember",
    // registry
    CreateRegistry => "createRegistry",
    GetRegistry => "getRegistry",
    ListRegistries => "listRegistries",
    UpdateRegistry => "updateRegistry",
    DeleteRegistry => "deleteRegistry",
    GetRegistryInfo => "getRegistryInfo",
    ListRegistryProviderTypes => "listRegistryProviderTypes",
    PingRegistry => "pingRegistry",
    // replication
    CreateReplicationPolicy => "createReplicationPolicy",
    GetReplicationPolicy => "getReplicationPolicy",
    ListReplicationPolicies => "listReplicationPolicies",
    UpdateReplicationPolicy => "updateReplicationPolicy",
    DeleteReplicationPolicy => "deleteReplicationPolicy",
    StartReplication => "startReplication",
    ListReplicationExecutions => "listReplicationExecutions",
    GetReplicationExecution => "getReplicationExecution",
    StopReplication => "stopReplication",
    ListReplicationTasks => "listReplicationTasks",
    // retention
    CreateRetention => "createRetention",
    GetRetention => "getRetention",
    UpdateRetention => "updateRetention",
    DeleteRetention => "deleteRetention",
    GetRetentionMetadata => "getRentenitionMetadata",
    TriggerRetentionExecution => "triggerRetentionExecution",
    ListRetentionExecutions => "listRetentionExecutions",
    // robot
    CreateRobot => "CreateRobot",
    ListRobot => "ListRobot",
    GetRobotById => "GetRobotByID",
    UpdateRobot => "UpdateRobot",
    DeleteRobot => "DeleteRobot",
    RefreshSec => "RefreshSec",
    // quota
    ListQuotas => "listQuotas",
    GetQuota => "getQuota",
    UpdateQuota => "updateQuota",
    // gc
    CreateGcSchedule => "createGCSchedule",
    UpdateGcSchedule => "updateGCSchedule",
    GetGcSchedule => "getGCSchedule",
    GetGcHistory => "getGCHistory",
    GetGc => "getGC",
    GetGcLog => "getGCLog",
    StopGc => "stopGC",
    // artifact
    ListArtifacts => "listArtifacts",
    GetArtifact => "getArtifact",
    DeleteArtifact => "deleteArtifact",
    CopyArtifact => "CopyArtifact",
    AddLabel => "addLabel",
    RemoveLabel => "removeLabel",
    CreateTag => "createTag",
    ListTags => "listTags",
    DeleteTag => "deleteTag",
    GetVulnerabilitiesAddition => "getVulnerabilitiesAddition",
    // system
    GetHealth => "getHealth",
    GetPing => "getPing",
    GetSystemInfo => "getSystemInfo",
    GetVolumes => "getVolumes",
    GetStatistic => "getStatistic",
    // label
    CreateLabel => "CreateLabel",
    GetLabelById => "GetLabelByID",
    ListLabels => "ListLabels",
    UpdateLabel => "UpdateLabel",
    DeleteLabel => "DeleteLabel",
    // auditlog
    ListAuditLogs => "listAuditLogs",
    GetLogs => "getLogs",
    // configure
    GetConfigurations => "getConfigurations",
    UpdateConfigurations => "updateConfigurations",
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
